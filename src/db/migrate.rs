use crate::db::log::audit;
use crate::ui::messages::warning;
use rusqlite::{Connection, Result};

/// Ensure that the `log` table exists with the current schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn log_has_column(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('log')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == name {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Databases created before targets were recorded lack the column.
fn migrate_add_target_to_log(conn: &Connection) -> Result<bool> {
    if log_has_column(conn, "target")? {
        return Ok(false);
    }

    warning("Adding 'target' column to log table...");
    conn.execute_batch("ALTER TABLE log ADD COLUMN target TEXT DEFAULT '';")?;
    Ok(true)
}

pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if migrate_add_target_to_log(conn)? {
        audit(conn, "migration_applied", "log", "added target column");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(conn: &Connection) -> Vec<String> {
        let mut stmt = conn.prepare("PRAGMA table_info('log')").unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
    }

    #[test]
    fn fresh_database_gets_log_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        assert_eq!(columns(&conn), vec!["id", "date", "operation", "target", "message"]);
    }

    #[test]
    fn old_log_table_gains_target_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE log (id INTEGER PRIMARY KEY AUTOINCREMENT, date TEXT NOT NULL,
             operation TEXT NOT NULL, message TEXT NOT NULL);",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();
        assert!(columns(&conn).contains(&"target".to_string()));

        let op: String = conn
            .query_row("SELECT operation FROM log ORDER BY id DESC LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(op, "migration_applied");

        // second run is a no-op
        run_pending_migrations(&conn).unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM log", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 1);
    }
}
