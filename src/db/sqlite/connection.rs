//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;

/// Open the catalog database.
///
/// WAL mode lets concurrent summary requests read while another connection
/// (the ingest side) writes.
pub fn create_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    Ok(conn)
}
