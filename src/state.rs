//! Application state management

use crate::config::ServerConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across all request handlers
pub struct AppState {
    /// SQLite catalog database
    pub sqlite: Arc<SqliteDb>,

    /// Application data directory
    pub data_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let data_dir = config.data_dir.clone();

        // Create data directory if it doesn't exist
        std::fs::create_dir_all(&data_dir)?;

        tracing::info!("Data directory: {:?}", data_dir);

        // Initialize catalog database
        let sqlite_path = data_dir.join("stockpulse.db");
        let sqlite = Arc::new(SqliteDb::new(&sqlite_path)?);

        Ok(Self { sqlite, data_dir })
    }
}
