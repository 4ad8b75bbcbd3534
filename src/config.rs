//! Server configuration
//!
//! Read once at startup from environment variables (a `.env` file is honored
//! when present). Every value has a sensible local-development default.

use std::env;
use std::path::PathBuf;

/// Runtime configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the catalog database file
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn from_env() -> crate::error::Result<Self> {
        let host = env::var("STOCKPULSE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match env::var("STOCKPULSE_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                crate::error::AppError::Config(format!("Invalid STOCKPULSE_PORT: {}", raw))
            })?,
            Err(_) => 8390,
        };

        let data_dir = env::var("STOCKPULSE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        Ok(Self {
            host,
            port,
            data_dir,
        })
    }
}
