//! v002: calibration_data (append-only outcomes per decision).

use rusqlite::Connection;

use surveyor_core::errors::SurveyorResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SurveyorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS calibration_data (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            routing_decision_id  TEXT NOT NULL,
            was_correct          INTEGER NOT NULL,
            actual_severity      TEXT NOT NULL,
            actual_urgency       TEXT NOT NULL,
            validated_by         TEXT,
            created_at           TEXT NOT NULL,
            FOREIGN KEY (routing_decision_id) REFERENCES routing_decisions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_calibration_decision ON calibration_data(routing_decision_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
