//! Domain types.

pub mod bill;
pub mod notification;

pub use bill::{Bill, BillDraft, BillPatch};
pub use notification::Notification;
