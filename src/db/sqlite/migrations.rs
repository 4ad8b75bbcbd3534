//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Run each migration
    run_migration(conn, "001_items", CREATE_ITEMS_TABLE)?;
    run_migration(conn, "002_sales", CREATE_SALES_TABLE)?;
    run_migration(conn, "003_engagement", CREATE_ENGAGEMENT_TABLE)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    // Check if migration already applied
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE items (
    item_id INTEGER PRIMARY KEY,
    item_name TEXT NOT NULL,
    item_type TEXT NOT NULL,
    category TEXT NOT NULL,
    current_stock INTEGER NOT NULL DEFAULT 0,
    launch_date TEXT,
    sale_price INTEGER NOT NULL DEFAULT 0,
    sale_discount INTEGER NOT NULL DEFAULT 0,
    batch TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_items_name ON items(item_name);
"#;

const CREATE_SALES_TABLE: &str = r#"
CREATE TABLE sales (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    total_value REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_sales_item_id ON sales(item_id);
CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);
"#;

const CREATE_ENGAGEMENT_TABLE: &str = r#"
CREATE TABLE engagement (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    items_viewed INTEGER NOT NULL DEFAULT 0,
    items_addedtocart INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_engagement_item_id ON engagement(item_id);
CREATE INDEX IF NOT EXISTS idx_engagement_date ON engagement(date);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run_and_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        // Second run must be a no-op, not a "table already exists" error
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);

        // All three tables queryable
        for table in ["items", "sales", "engagement"] {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let rows: i64 = conn.query_row(&sql, [], |row| row.get(0)).unwrap();
            assert_eq!(rows, 0);
        }
    }
}
