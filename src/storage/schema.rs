//! Shelf table definition and bootstrap.
//!
//! A shelf database holds exactly one logical table. Its layout matches
//! shelves created by earlier tools, so an existing file opens in place.

use rusqlite::{Connection, OptionalExtension, Result};
use tracing::{debug, info};

/// Name of the single record table.
pub const TABLE_NAME: &str = "shelf";

/// DDL for the record table.
///
/// `id` is internal and only orders iteration. `key_str` carries the
/// uniqueness constraint that upserts rely on.
pub const CREATE_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS shelf (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key_str TEXT NOT NULL,
    value_str BLOB NOT NULL,
    UNIQUE(key_str)
);
";

/// Set connection pragmas.
///
/// `synchronous=FULL` keeps acknowledged writes across power loss in WAL
/// mode. In-memory databases ignore the journal mode request.
///
/// # Errors
///
/// Returns an error if a pragma cannot be applied, which is also how a
/// file that is not a SQLite database first shows up.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    Ok(())
}

/// Check whether the record table exists.
///
/// # Errors
///
/// Returns an error if `sqlite_master` cannot be queried.
pub fn table_exists(conn: &Connection) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND tbl_name = ?1",
        [TABLE_NAME],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
}

/// Ensure the record table exists, creating it if absent.
///
/// Never drops or alters an existing table.
///
/// # Errors
///
/// Returns an error if the lookup or the DDL fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    if table_exists(conn)? {
        debug!(table = TABLE_NAME, "Shelf table present");
        return Ok(());
    }

    conn.execute_batch(CREATE_TABLE_SQL)?;
    info!(table = TABLE_NAME, "Created shelf table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn).unwrap());

        apply_schema(&conn).expect("Failed to apply schema");
        assert!(table_exists(&conn).unwrap());

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('shelf') ORDER BY cid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(columns, ["id", "key_str", "value_str"]);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        conn.execute(
            "INSERT INTO shelf (key_str, value_str) VALUES ('MN', X'00')",
            [],
        )
        .unwrap();
        apply_schema(&conn).expect("Second apply failed");

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM shelf", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unique_key_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO shelf (key_str, value_str) VALUES ('AL', X'01')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO shelf (key_str, value_str) VALUES ('AL', X'02')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_accepts_legacy_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "create table shelf (id integer primary key autoincrement, key_str text, value_str text, unique(key_str))",
        )
        .unwrap();

        apply_schema(&conn).unwrap();
        assert!(table_exists(&conn).unwrap());
    }
}
