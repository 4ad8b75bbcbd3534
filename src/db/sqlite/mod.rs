//! SQLite database module

pub mod models;
mod catalog;
mod connection;
mod migrations;

use crate::error::Result;
use models::{CatalogSnapshot, DistinctValues};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Create new SQLite database connection
    pub fn new(path: &Path) -> Result<Self> {
        let conn = connection::create_connection(path)?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        // Run migrations
        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Catalog Methods ==========

    /// Load the full catalog snapshot for one summary computation
    pub fn load_catalog_snapshot(&self) -> Result<CatalogSnapshot> {
        let conn = self.conn.lock();
        catalog::load_snapshot(&conn)
    }

    /// Distinct item attribute values for filter dropdowns
    pub fn distinct_values(&self) -> Result<DistinctValues> {
        let conn = self.conn.lock();
        catalog::distinct_values(&conn)
    }
}
