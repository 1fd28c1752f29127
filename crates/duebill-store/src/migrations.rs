//! Ordered, named schema migration chain.
//!
//! Applied revisions are recorded in `schema_migrations`. A database
//! created before tracking existed (it has a `bills` table but no
//! `schema_migrations`) is stamped at the baseline revision set first,
//! then newer migrations run on top of it.

use duebill_core::error::{DueBillError, Result};
use rusqlite::Connection;

/// Revisions considered already applied when stamping a pre-tracking
/// database: everything up to the config-key rework.
const BASELINE: &[&str] = &["0001_bills", "0002_config"];

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_bills",
        "CREATE TABLE bills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            recipient TEXT NOT NULL,
            due_day INTEGER NOT NULL,
            amount TEXT NOT NULL,
            paid INTEGER DEFAULT 0
        );
        CREATE INDEX ix_bills_id ON bills (id);",
    ),
    (
        "0002_config",
        "CREATE TABLE config (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL
        );
        CREATE INDEX ix_config_id ON config (id);",
    ),
    // config.key stops being unique: one key may hold a list of values
    // (multiple notify_target rows). SQLite cannot drop a constraint in
    // place, so the table is rebuilt.
    (
        "0003_config_key_many",
        "CREATE TABLE config_new (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            value TEXT NOT NULL
        );
        INSERT INTO config_new (id, key, value) SELECT id, key, value FROM config;
        DROP TABLE config;
        ALTER TABLE config_new RENAME TO config;
        CREATE INDEX ix_config_id ON config (id);",
    ),
];

fn mig_err(e: rusqlite::Error) -> DueBillError {
    DueBillError::Migration(e.to_string())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
    .map_err(mig_err)
}

fn is_applied(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM schema_migrations WHERE name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
    .map_err(mig_err)
}

/// Bring the database up to the latest revision.
///
/// Callers treat failures as non-fatal: the store stays usable against an
/// already-current schema even when migration bookkeeping fails.
pub fn apply(conn: &Connection) -> Result<()> {
    let had_tracking = table_exists(conn, "schema_migrations")?;
    let had_bills = table_exists(conn, "bills")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(mig_err)?;

    if had_bills && !had_tracking {
        // Pre-tracking database: record the baseline without re-running it.
        for name in BASELINE {
            conn.execute(
                "INSERT OR IGNORE INTO schema_migrations (name) VALUES (?1)",
                [*name],
            )
            .map_err(mig_err)?;
        }
        tracing::debug!("Stamped pre-tracking database at baseline");
    }

    for (name, sql) in MIGRATIONS {
        if is_applied(conn, name)? {
            continue;
        }
        let tx = conn.unchecked_transaction().map_err(mig_err)?;
        tx.execute_batch(sql)
            .map_err(|e| DueBillError::Migration(format!("{name}: {e}")))?;
        tx.execute(
            "INSERT INTO schema_migrations (name) VALUES (?1)",
            [*name],
        )
        .map_err(mig_err)?;
        tx.commit().map_err(mig_err)?;
        tracing::debug!("Applied migration {name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_runs_full_chain() {
        let conn = Connection::open_in_memory().unwrap();
        apply(&conn).unwrap();
        assert!(table_exists(&conn, "bills").unwrap());
        assert!(table_exists(&conn, "config").unwrap());
        for (name, _) in MIGRATIONS {
            assert!(is_applied(&conn, name).unwrap(), "{name} not recorded");
        }
        // Config key is no longer unique after the rework.
        conn.execute(
            "INSERT INTO config (key, value) VALUES ('notify_target', 'a')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES ('notify_target', 'b')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_apply_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply(&conn).unwrap();
        apply(&conn).unwrap();
    }

    #[test]
    fn test_pre_tracking_database_is_stamped_then_upgraded() {
        let conn = Connection::open_in_memory().unwrap();
        // Old database shape: bills plus a unique-keyed config, no tracking.
        conn.execute_batch(
            "CREATE TABLE bills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                recipient TEXT NOT NULL,
                due_day INTEGER NOT NULL,
                amount TEXT NOT NULL,
                paid INTEGER DEFAULT 0
            );
            CREATE TABLE config (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL UNIQUE,
                value TEXT NOT NULL
            );
            INSERT INTO config (key, value) VALUES ('notify_target', 'mailto://u:p@h/rcpt');",
        )
        .unwrap();

        apply(&conn).unwrap();

        // Baseline stamped, rework applied on top, existing rows kept.
        assert!(is_applied(&conn, "0001_bills").unwrap());
        assert!(is_applied(&conn, "0002_config").unwrap());
        assert!(is_applied(&conn, "0003_config_key_many").unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM config", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        // Duplicate keys are now allowed.
        conn.execute(
            "INSERT INTO config (key, value) VALUES ('notify_target', 'second')",
            [],
        )
        .unwrap();
    }
}
