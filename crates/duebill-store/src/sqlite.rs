//! SQLite bill store.

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use duebill_core::error::{DueBillError, Result};
use duebill_core::types::{Bill, BillDraft, BillPatch};

use crate::migrations;

/// Config key under which notify target descriptors are stored. One row
/// per configured target; the key is deliberately non-unique.
pub const NOTIFY_TARGET_KEY: &str = "notify_target";

/// Bill and config persistence over one SQLite connection.
///
/// Every mutating call commits before returning (SQLite autocommit); no
/// batching is exposed to callers.
pub struct BillStore {
    conn: Mutex<Connection>,
}

fn db_err(e: rusqlite::Error) -> DueBillError {
    DueBillError::Storage(e.to_string())
}

impl BillStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Pending migrations are applied best-effort: a failure is logged
    /// and swallowed, since the schema may already be current. The
    /// idempotent schema creation afterwards is the operation that must
    /// succeed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        if let Err(e) = migrations::apply(&conn) {
            tracing::warn!("Schema migration skipped: {e}");
        }
        Self::ensure_schema(&conn)?;
        tracing::debug!("Bill store opened: {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the database at the default (or `DUEBILL_DB`) location.
    pub fn open_default() -> Result<Self> {
        Self::open(&duebill_core::config::db_path())
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                recipient TEXT NOT NULL,
                due_day INTEGER NOT NULL,
                amount TEXT NOT NULL,
                paid INTEGER DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS config (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL,
                value TEXT NOT NULL
            );",
        )
        .map_err(db_err)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DueBillError::Storage(e.to_string()))
    }

    fn row_to_bill(row: &rusqlite::Row<'_>) -> rusqlite::Result<Bill> {
        Ok(Bill {
            id: row.get(0)?,
            name: row.get(1)?,
            recipient: row.get(2)?,
            due_day: row.get::<_, i64>(3)? as u8,
            amount: row
                .get::<_, String>(4)
                .map(|s| Decimal::from_str(&s).unwrap_or_default())?,
            paid: row.get::<_, Option<i64>>(5)?.unwrap_or(0) != 0,
        })
    }

    /// All bills in insertion (id) order.
    pub fn list(&self) -> Result<Vec<Bill>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, name, recipient, due_day, amount, paid FROM bills ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt.query_map([], Self::row_to_bill).map_err(db_err)?;
        let mut bills = Vec::new();
        for row in rows {
            bills.push(row.map_err(db_err)?);
        }
        Ok(bills)
    }

    pub fn get(&self, id: i64) -> Result<Bill> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, name, recipient, due_day, amount, paid FROM bills WHERE id = ?1",
            params![id],
            Self::row_to_bill,
        )
        .optional()
        .map_err(db_err)?
        .ok_or(DueBillError::NotFound(id))
    }

    /// Insert a new bill; the store assigns the id.
    pub fn create(&self, draft: &BillDraft) -> Result<Bill> {
        draft.validate()?;
        let amount = draft.amount.round_dp(2);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO bills (name, recipient, due_day, amount, paid) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.name,
                draft.recipient,
                i64::from(draft.due_day),
                amount.to_string(),
                draft.paid as i64,
            ],
        )
        .map_err(db_err)?;
        Ok(Bill {
            id: conn.last_insert_rowid(),
            name: draft.name.clone(),
            recipient: draft.recipient.clone(),
            due_day: draft.due_day,
            amount,
            paid: draft.paid,
        })
    }

    /// Apply a partial update; untouched fields keep their values.
    pub fn update(&self, id: i64, patch: &BillPatch) -> Result<Bill> {
        let mut bill = self.get(id)?;
        patch.apply(&mut bill);
        let draft = BillDraft {
            name: bill.name.clone(),
            recipient: bill.recipient.clone(),
            due_day: bill.due_day,
            amount: bill.amount,
            paid: bill.paid,
        };
        draft.validate()?;
        bill.amount = bill.amount.round_dp(2);

        let conn = self.lock()?;
        conn.execute(
            "UPDATE bills SET name = ?1, recipient = ?2, due_day = ?3, amount = ?4, paid = ?5 WHERE id = ?6",
            params![
                bill.name,
                bill.recipient,
                i64::from(bill.due_day),
                bill.amount.to_string(),
                bill.paid as i64,
                id,
            ],
        )
        .map_err(db_err)?;
        Ok(bill)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let affected = conn
            .execute("DELETE FROM bills WHERE id = ?1", params![id])
            .map_err(db_err)?;
        if affected == 0 {
            return Err(DueBillError::NotFound(id));
        }
        Ok(())
    }

    /// Remove every bill; returns how many were deleted.
    pub fn delete_all(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM bills", []).map_err(db_err)
    }

    pub fn set_paid(&self, id: i64, paid: bool) -> Result<()> {
        let conn = self.lock()?;
        let affected = conn
            .execute(
                "UPDATE bills SET paid = ?1 WHERE id = ?2",
                params![paid as i64, id],
            )
            .map_err(db_err)?;
        if affected == 0 {
            return Err(DueBillError::NotFound(id));
        }
        Ok(())
    }

    /// Flip the paid flag on every bill; returns how many rows matched.
    pub fn set_all_paid(&self, paid: bool) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("UPDATE bills SET paid = ?1", params![paid as i64])
            .map_err(db_err)
    }

    /// Append one notify target descriptor. Repeated calls accumulate;
    /// duplicates are allowed.
    pub fn add_notify_target(&self, url: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)",
            params![NOTIFY_TARGET_KEY, url],
        )
        .map_err(db_err)?;
        Ok(())
    }

    /// All configured notify target descriptors, in the order added.
    pub fn list_notify_targets(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT value FROM config WHERE key = ?1 ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![NOTIFY_TARGET_KEY], |row| row.get::<_, String>(0))
            .map_err(db_err)?;
        let mut targets = Vec::new();
        for row in rows {
            targets.push(row.map_err(db_err)?);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, BillStore) {
        let dir = TempDir::new().unwrap();
        let store = BillStore::open(&dir.path().join("bills.db")).unwrap();
        (dir, store)
    }

    fn rent() -> BillDraft {
        BillDraft::new("Rent", "Landlord", 5, Decimal::from_str("1200").unwrap())
    }

    #[test]
    fn test_create_assigns_ids_and_rounds_amount() {
        let (_dir, store) = open_temp();
        let mut draft = rent();
        draft.amount = Decimal::from_str("1200.005").unwrap();
        let bill = store.create(&draft).unwrap();
        assert_eq!(bill.id, 1);
        assert_eq!(bill.amount, Decimal::from_str("1200.00").unwrap());
        assert!(!bill.paid);

        let second = store.create(&rent()).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let (_dir, store) = open_temp();
        for name in ["Rent", "Water", "Internet"] {
            let mut draft = rent();
            draft.name = name.into();
            store.create(&draft).unwrap();
        }
        let names: Vec<String> = store.list().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Rent", "Water", "Internet"]);
    }

    #[test]
    fn test_get_round_trips() {
        let (_dir, store) = open_temp();
        let created = store.create(&rent()).unwrap();
        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_missing_ids_report_not_found() {
        let (_dir, store) = open_temp();
        assert!(matches!(store.get(99), Err(DueBillError::NotFound(99))));
        assert!(matches!(store.delete(99), Err(DueBillError::NotFound(99))));
        assert!(matches!(
            store.set_paid(99, true),
            Err(DueBillError::NotFound(99))
        ));
        assert!(matches!(
            store.update(99, &BillPatch::default()),
            Err(DueBillError::NotFound(99))
        ));
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let (_dir, store) = open_temp();
        let bill = store.create(&rent()).unwrap();
        let patch = BillPatch {
            amount: Some(Decimal::from_str("1250.50").unwrap()),
            ..Default::default()
        };
        let updated = store.update(bill.id, &patch).unwrap();
        assert_eq!(updated.amount, Decimal::from_str("1250.50").unwrap());
        assert_eq!(updated.name, "Rent");
        assert_eq!(store.get(bill.id).unwrap(), updated);
    }

    #[test]
    fn test_update_rejects_invalid_due_day() {
        let (_dir, store) = open_temp();
        let bill = store.create(&rent()).unwrap();
        let patch = BillPatch {
            due_day: Some(0),
            ..Default::default()
        };
        assert!(store.update(bill.id, &patch).is_err());
        // Stored row untouched.
        assert_eq!(store.get(bill.id).unwrap().due_day, 5);
    }

    #[test]
    fn test_set_paid_is_idempotent() {
        let (_dir, store) = open_temp();
        let bill = store.create(&rent()).unwrap();
        store.set_paid(bill.id, true).unwrap();
        store.set_paid(bill.id, true).unwrap();
        assert!(store.get(bill.id).unwrap().paid);
    }

    #[test]
    fn test_set_all_paid_twice_leaves_all_paid() {
        let (_dir, store) = open_temp();
        store.create(&rent()).unwrap();
        store.create(&rent()).unwrap();
        assert_eq!(store.set_all_paid(true).unwrap(), 2);
        assert_eq!(store.set_all_paid(true).unwrap(), 2);
        assert!(store.list().unwrap().iter().all(|b| b.paid));
    }

    #[test]
    fn test_delete_and_delete_all() {
        let (_dir, store) = open_temp();
        let bill = store.create(&rent()).unwrap();
        store.create(&rent()).unwrap();
        store.delete(bill.id).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.delete_all().unwrap(), 1);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_notify_targets_are_list_valued() {
        let (_dir, store) = open_temp();
        assert!(store.list_notify_targets().unwrap().is_empty());
        store.add_notify_target("mailto://u:p@h/rcpt").unwrap();
        store.add_notify_target("discord://1/abc").unwrap();
        store.add_notify_target("discord://1/abc").unwrap();
        assert_eq!(
            store.list_notify_targets().unwrap(),
            vec!["mailto://u:p@h/rcpt", "discord://1/abc", "discord://1/abc"]
        );
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bills.db");
        {
            let store = BillStore::open(&path).unwrap();
            store.create(&rent()).unwrap();
        }
        let store = BillStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
