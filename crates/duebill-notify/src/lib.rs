//! # DueBill Notify
//! Due-day matching, digest rendering, and channel fan-out.

pub mod digest;
pub mod dispatch;
pub mod matcher;

pub use digest::{DIGEST_TITLE, render_digest};
pub use dispatch::{ChannelOutcome, DispatchReport, SEND_TIMEOUT, dispatch};
pub use matcher::{due_day_window, due_soon};
