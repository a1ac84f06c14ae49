//! Training corrections: submit, review, select for training, mark consumed.

use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::{CorrectionStatus, TrainingCorrection};

use super::{fmt_dt, parse_dt, to_json};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT id, routing_decision_id, image_path, labels, status,
        used_in_training, model_version, created_at
     FROM training_corrections";

pub fn submit_correction(conn: &Connection, correction: &TrainingCorrection) -> SurveyorResult<()> {
    conn.execute(
        "INSERT INTO training_corrections (
            id, routing_decision_id, image_path, labels, status,
            used_in_training, model_version, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            correction.id,
            correction.routing_decision_id,
            correction.image_path,
            to_json(&correction.labels)?,
            correction.status.as_str(),
            correction.used_in_training,
            correction.model_version,
            fmt_dt(&correction.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("submit_correction {}: {e}", correction.id)))?;
    Ok(())
}

pub fn get_correction(conn: &Connection, id: &str) -> SurveyorResult<Option<TrainingCorrection>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![id], |row| Ok(row_to_correction(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

pub fn set_correction_status(
    conn: &Connection,
    id: &str,
    status: CorrectionStatus,
) -> SurveyorResult<()> {
    let changed = conn
        .execute(
            "UPDATE training_corrections SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )
        .map_err(|e| to_storage_err(format!("set_correction_status {id}: {e}")))?;
    if changed == 0 {
        return Err(SurveyorError::CorrectionNotFound { id: id.to_string() });
    }
    Ok(())
}

pub fn count_approved_unused(conn: &Connection) -> SurveyorResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM training_corrections
             WHERE status = 'approved' AND used_in_training = 0",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Approved, unused corrections, oldest first, capped at `limit`.
pub fn approved_unused(conn: &Connection, limit: usize) -> SurveyorResult<Vec<TrainingCorrection>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE status = 'approved' AND used_in_training = 0
             ORDER BY created_at ASC, rowid ASC
             LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_correction(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Flag corrections as consumed by `model_version`. Rows already consumed are
/// left untouched, so a correction is attributed to exactly one model.
pub fn mark_used(conn: &Connection, ids: &[String], model_version: &str) -> SurveyorResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("mark_used begin: {e}")))?;
    let marked = mark_used_in(&tx, ids, model_version)?;
    tx.commit()
        .map_err(|e| to_storage_err(format!("mark_used commit: {e}")))?;
    Ok(marked)
}

/// `mark_used` without its own transaction, for callers that already hold one.
pub(crate) fn mark_used_in(
    conn: &Connection,
    ids: &[String],
    model_version: &str,
) -> SurveyorResult<usize> {
    let mut stmt = conn
        .prepare(
            "UPDATE training_corrections
             SET used_in_training = 1, model_version = ?2
             WHERE id = ?1 AND used_in_training = 0",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut marked = 0;
    for id in ids {
        marked += stmt
            .execute(params![id, model_version])
            .map_err(|e| to_storage_err(format!("mark_used {id}: {e}")))?;
    }
    Ok(marked)
}

fn row_to_correction(row: &rusqlite::Row<'_>) -> SurveyorResult<TrainingCorrection> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let labels: String = row.get(3).map_err(get_err)?;
    let status: String = row.get(4).map_err(get_err)?;
    let created_at: String = row.get(7).map_err(get_err)?;
    Ok(TrainingCorrection {
        id: row.get(0).map_err(get_err)?,
        routing_decision_id: row.get(1).map_err(get_err)?,
        image_path: row.get(2).map_err(get_err)?,
        labels: serde_json::from_str(&labels)
            .map_err(|e| to_storage_err(format!("parse labels: {e}")))?,
        status: status.parse::<CorrectionStatus>()?,
        used_in_training: row.get(5).map_err(get_err)?,
        model_version: row.get(6).map_err(get_err)?,
        created_at: parse_dt(&created_at)?,
    })
}
