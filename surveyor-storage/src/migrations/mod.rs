//! Forward-only schema migrations, tracked in `schema_version`.

mod v001_routing_decisions;
mod v002_calibration_data;
mod v003_model_registry;
mod v004_retraining_tables;

use rusqlite::{params, Connection};

use surveyor_core::errors::{StorageError, SurveyorError, SurveyorResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> SurveyorResult<()>;

const MIGRATIONS: [(u32, Migration); 4] = [
    (1, v001_routing_decisions::migrate),
    (2, v002_calibration_data::migrate),
    (3, v003_model_registry::migrate),
    (4, v004_retraining_tables::migrate),
];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 4;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> SurveyorResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {version} begin: {e}")))?;
        migrate(&tx).map_err(|e| {
            SurveyorError::StorageError(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration {version} commit: {e}")))?;
        tracing::debug!(version, "applied migration");
    }
    current_version(conn)
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> SurveyorResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
