//! # DueBill Store
//! Bill and config persistence over a local SQLite file.

pub mod migrations;
pub mod sqlite;

pub use sqlite::{BillStore, NOTIFY_TARGET_KEY};
