//! v001: routing_decisions.

use rusqlite::Connection;

use surveyor_core::errors::SurveyorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SurveyorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS routing_decisions (
            id                   TEXT PRIMARY KEY,
            request_id           TEXT NOT NULL,
            route                TEXT NOT NULL,
            confidence           REAL NOT NULL,
            reasoning            TEXT NOT NULL,
            internal_prediction  TEXT,
            external_prediction  TEXT,
            agreement_score      REAL,
            inference_time_ms    INTEGER NOT NULL DEFAULT 0,
            model_version        TEXT,
            fusion               TEXT,
            evidence             TEXT,
            created_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_decisions_route ON routing_decisions(route);
        CREATE INDEX IF NOT EXISTS idx_decisions_created ON routing_decisions(created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
