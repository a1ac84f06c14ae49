//! Single write connection behind `tokio::sync::Mutex`.
//! Serialized writes, one connection.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use surveyor_core::errors::SurveyorResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> SurveyorResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> SurveyorResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, 5_000)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Synchronous access for non-async contexts. Must not be called from
    /// inside an async task; use `spawn_blocking` there.
    pub fn with_conn_sync<F, T>(&self, f: F) -> SurveyorResult<T>
    where
        F: FnOnce(&Connection) -> SurveyorResult<T>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }
}
