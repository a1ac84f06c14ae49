//! Append and read calibration outcomes; decisions ⋈ latest outcome.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::{CalibratedDecision, CalibrationRecord, Route, Severity, Urgency};

use super::decision_ops::decision_exists;
use super::{fmt_dt, from_json_opt, parse_dt};
use crate::to_storage_err;

/// Join clause selecting only the newest outcome per decision. Outcomes are
/// append-only, so the highest id is the last write.
pub(crate) const LATEST_OUTCOME_JOIN: &str = "LEFT JOIN calibration_data c ON c.id = (
        SELECT MAX(c2.id) FROM calibration_data c2 WHERE c2.routing_decision_id = d.id
    )";

/// Append an outcome row. Returns the new row id.
pub fn insert_outcome(conn: &Connection, record: &CalibrationRecord) -> SurveyorResult<i64> {
    if !decision_exists(conn, &record.routing_decision_id)? {
        return Err(SurveyorError::DecisionNotFound {
            id: record.routing_decision_id.clone(),
        });
    }
    conn.execute(
        "INSERT INTO calibration_data (
            routing_decision_id, was_correct, actual_severity, actual_urgency,
            validated_by, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.routing_decision_id,
            record.was_correct,
            record.actual_severity.as_str(),
            record.actual_urgency.as_str(),
            record.validated_by,
            fmt_dt(&record.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_outcome: {e}")))?;
    Ok(conn.last_insert_rowid())
}

const SELECT_OUTCOME: &str = "SELECT id, routing_decision_id, was_correct, actual_severity,
        actual_urgency, validated_by, created_at
     FROM calibration_data";

/// The newest outcome for a decision.
pub fn latest_outcome(
    conn: &Connection,
    decision_id: &str,
) -> SurveyorResult<Option<CalibrationRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_OUTCOME} WHERE routing_decision_id = ?1 ORDER BY id DESC LIMIT 1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![decision_id], |row| Ok(row_to_record(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// All outcomes for a decision, oldest first.
pub fn outcome_history(
    conn: &Connection,
    decision_id: &str,
) -> SurveyorResult<Vec<CalibrationRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_OUTCOME} WHERE routing_decision_id = ?1 ORDER BY id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![decision_id], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

/// Every decision (optionally since a timestamp) with its latest outcome.
/// Decisions without outcomes are included with `was_correct = None`.
pub fn calibrated_decisions(
    conn: &Connection,
    since: Option<DateTime<Utc>>,
) -> SurveyorResult<Vec<CalibratedDecision>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT d.id, d.route, d.confidence, d.inference_time_ms, d.evidence,
                    d.created_at, c.was_correct
             FROM routing_decisions d
             {LATEST_OUTCOME_JOIN}
             WHERE ?1 IS NULL OR d.created_at >= ?1
             ORDER BY d.created_at ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let since_str = since.as_ref().map(fmt_dt);
    let rows = stmt
        .query_map(params![since_str], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<bool>>(6)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, route, confidence, inference_ms, evidence, created_at, was_correct) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(CalibratedDecision {
            decision_id: id,
            route: route.parse::<Route>()?,
            confidence,
            inference_time_ms: inference_ms.max(0) as u64,
            was_correct,
            evidence: from_json_opt(evidence, "evidence")?,
            created_at: parse_dt(&created_at)?,
        });
    }
    Ok(out)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> SurveyorResult<CalibrationRecord> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let severity: String = row.get(3).map_err(get_err)?;
    let urgency: String = row.get(4).map_err(get_err)?;
    let created_at: String = row.get(6).map_err(get_err)?;
    Ok(CalibrationRecord {
        id: row.get(0).map_err(get_err)?,
        routing_decision_id: row.get(1).map_err(get_err)?,
        was_correct: row.get(2).map_err(get_err)?,
        actual_severity: severity.parse::<Severity>()?,
        actual_urgency: urgency.parse::<Urgency>()?,
        validated_by: row.get(5).map_err(get_err)?,
        created_at: parse_dt(&created_at)?,
    })
}
