//! v003: model_registry. The partial unique index enforces at most one
//! active entry per model type.

use rusqlite::Connection;

use surveyor_core::errors::SurveyorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SurveyorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS model_registry (
            id              TEXT PRIMARY KEY,
            model_type      TEXT NOT NULL,
            version         TEXT NOT NULL,
            accuracy        REAL,
            sample_count    INTEGER NOT NULL DEFAULT 0,
            is_active       INTEGER NOT NULL DEFAULT 0,
            artifact_path   TEXT,
            created_at      TEXT NOT NULL,
            UNIQUE (model_type, version)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_registry_single_active
            ON model_registry(model_type) WHERE is_active = 1;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
