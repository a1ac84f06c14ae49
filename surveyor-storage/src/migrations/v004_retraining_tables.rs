//! v004: training_corrections, retraining_jobs, retraining_leases.

use rusqlite::Connection;

use surveyor_core::errors::SurveyorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SurveyorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS training_corrections (
            id                   TEXT PRIMARY KEY,
            routing_decision_id  TEXT,
            image_path           TEXT NOT NULL,
            labels               TEXT NOT NULL DEFAULT '[]',
            status               TEXT NOT NULL DEFAULT 'pending',
            used_in_training     INTEGER NOT NULL DEFAULT 0,
            model_version        TEXT,
            created_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_corrections_eligible
            ON training_corrections(status, used_in_training, created_at);

        CREATE TABLE IF NOT EXISTS retraining_jobs (
            id                 TEXT PRIMARY KEY,
            status             TEXT NOT NULL,
            corrections_count  INTEGER NOT NULL DEFAULT 0,
            model_version      TEXT,
            onnx_path          TEXT,
            metrics            TEXT,
            error              TEXT,
            created_at         TEXT NOT NULL,
            started_at         TEXT,
            completed_at       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_status_completed
            ON retraining_jobs(status, completed_at);

        CREATE TABLE IF NOT EXISTS retraining_leases (
            name         TEXT PRIMARY KEY,
            holder       TEXT NOT NULL,
            acquired_at  TEXT NOT NULL,
            expires_at   TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
