//! CSV import/export for bills.
//!
//! Header: `name,recipient,due_day,amount,paid`. Export writes `paid` as
//! `True`/`False`; import accepts true/1/yes (case-insensitive) as
//! truthy and anything else as falsy. Malformed rows are skipped and
//! counted, not fatal; a missing required column is.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use duebill_core::error::{DueBillError, Result};
use duebill_core::types::BillDraft;
use duebill_store::BillStore;

pub const CSV_HEADERS: [&str; 5] = ["name", "recipient", "due_day", "amount", "paid"];
const REQUIRED_COLUMNS: [&str; 4] = ["name", "recipient", "due_day", "amount"];

/// Counts reported back to the user after an import.
#[derive(Debug)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    /// Rows cleared up front when `--overwrite` was given.
    pub deleted: Option<usize>,
}

fn csv_err(e: csv::Error) -> DueBillError {
    let msg = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => DueBillError::Io(io),
        _ => DueBillError::Validation(msg),
    }
}

struct Columns {
    name: usize,
    recipient: usize,
    due_day: usize,
    amount: usize,
    paid: Option<usize>,
}

impl Columns {
    fn detect(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: &str| headers.iter().position(|h| h.trim() == column);
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| find(column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DueBillError::validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }
        match (
            find("name"),
            find("recipient"),
            find("due_day"),
            find("amount"),
        ) {
            (Some(name), Some(recipient), Some(due_day), Some(amount)) => Ok(Self {
                name,
                recipient,
                due_day,
                amount,
                paid: find("paid"),
            }),
            _ => Err(DueBillError::validation("Missing required columns")),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<BillDraft> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let due_day_raw = field(columns.due_day);
    let due_day: u8 = due_day_raw
        .parse()
        .map_err(|_| DueBillError::validation(format!("invalid due_day '{due_day_raw}'")))?;

    let amount_raw = field(columns.amount);
    let amount = Decimal::from_str(amount_raw)
        .map_err(|_| DueBillError::validation(format!("invalid amount '{amount_raw}'")))?;

    let draft = BillDraft {
        name: field(columns.name).to_string(),
        recipient: field(columns.recipient).to_string(),
        due_day,
        amount: amount.round_dp(2),
        paid: columns.paid.map(|idx| is_truthy(field(idx))).unwrap_or(false),
    };
    draft.validate()?;
    Ok(draft)
}

/// Import bills from `path`. Malformed rows are reported and skipped;
/// store failures abort. With `overwrite`, all existing bills are
/// removed first (after the header check, so a bad file costs nothing).
pub fn import_bills(store: &BillStore, path: &Path, overwrite: bool) -> Result<ImportSummary> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = Columns::detect(&headers)?;

    let deleted = if overwrite {
        Some(store.delete_all()?)
    } else {
        None
    };

    let mut added = 0usize;
    let mut skipped = 0usize;
    for (row_number, record) in reader.records().enumerate() {
        let row = row_number + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                println!("Skipping row {row}: {e}");
                continue;
            }
        };
        match parse_row(&record, &columns) {
            Ok(draft) => {
                store.create(&draft)?;
                added += 1;
            }
            Err(e) => {
                skipped += 1;
                println!("Skipping row {row}: {e}");
            }
        }
    }

    Ok(ImportSummary {
        added,
        skipped,
        deleted,
    })
}

/// Export every bill to `path`; returns how many were written.
pub fn export_bills(store: &BillStore, path: &Path) -> Result<usize> {
    let bills = store.list()?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(CSV_HEADERS).map_err(csv_err)?;
    for bill in &bills {
        let due_day = bill.due_day.to_string();
        let amount = format!("{:.2}", bill.amount);
        writer
            .write_record([
                bill.name.as_str(),
                bill.recipient.as_str(),
                due_day.as_str(),
                amount.as_str(),
                if bill.paid { "True" } else { "False" },
            ])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(bills.len())
}
