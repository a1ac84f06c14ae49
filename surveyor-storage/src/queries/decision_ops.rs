//! Insert and read routing decisions.

use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::SurveyorResult;
use surveyor_core::models::{Route, RoutingDecision};

use super::{fmt_dt, from_json_opt, parse_dt, to_json};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT id, request_id, route, confidence, reasoning,
        internal_prediction, external_prediction, agreement_score,
        inference_time_ms, model_version, fusion, evidence, created_at
     FROM routing_decisions";

/// Insert a routing decision. Decisions are immutable, so a duplicate id fails.
pub fn insert_decision(conn: &Connection, decision: &RoutingDecision) -> SurveyorResult<()> {
    let internal = decision
        .internal_prediction
        .as_ref()
        .map(to_json)
        .transpose()?;
    let external = decision
        .external_prediction
        .as_ref()
        .map(to_json)
        .transpose()?;
    let fusion = decision.fusion.as_ref().map(to_json).transpose()?;
    let evidence = decision.evidence.as_ref().map(to_json).transpose()?;

    conn.execute(
        "INSERT INTO routing_decisions (
            id, request_id, route, confidence, reasoning, internal_prediction,
            external_prediction, agreement_score, inference_time_ms, model_version,
            fusion, evidence, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            decision.id,
            decision.request_id,
            decision.route.as_str(),
            decision.confidence,
            decision.reasoning,
            internal,
            external,
            decision.agreement_score,
            decision.inference_time_ms as i64,
            decision.model_version,
            fusion,
            evidence,
            fmt_dt(&decision.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_decision: {e}")))?;
    Ok(())
}

/// Get a routing decision by id.
pub fn get_decision(conn: &Connection, id: &str) -> SurveyorResult<Option<RoutingDecision>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![id], |row| Ok(read_row(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(|r| r.and_then(into_decision)).transpose()
}

/// Most recent decisions first.
pub fn recent_decisions(conn: &Connection, limit: usize) -> SurveyorResult<Vec<RoutingDecision>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(read_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut decisions = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))??;
        decisions.push(into_decision(raw)?);
    }
    Ok(decisions)
}

/// Check whether a decision exists.
pub fn decision_exists(conn: &Connection, id: &str) -> SurveyorResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM routing_decisions WHERE id = ?1)",
        params![id],
        |row| row.get::<_, bool>(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

struct RawDecision {
    id: String,
    request_id: String,
    route: String,
    confidence: f64,
    reasoning: String,
    internal_prediction: Option<String>,
    external_prediction: Option<String>,
    agreement_score: Option<f64>,
    inference_time_ms: i64,
    model_version: Option<String>,
    fusion: Option<String>,
    evidence: Option<String>,
    created_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> SurveyorResult<RawDecision> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    Ok(RawDecision {
        id: row.get(0).map_err(get_err)?,
        request_id: row.get(1).map_err(get_err)?,
        route: row.get(2).map_err(get_err)?,
        confidence: row.get(3).map_err(get_err)?,
        reasoning: row.get(4).map_err(get_err)?,
        internal_prediction: row.get(5).map_err(get_err)?,
        external_prediction: row.get(6).map_err(get_err)?,
        agreement_score: row.get(7).map_err(get_err)?,
        inference_time_ms: row.get(8).map_err(get_err)?,
        model_version: row.get(9).map_err(get_err)?,
        fusion: row.get(10).map_err(get_err)?,
        evidence: row.get(11).map_err(get_err)?,
        created_at: row.get(12).map_err(get_err)?,
    })
}

fn into_decision(raw: RawDecision) -> SurveyorResult<RoutingDecision> {
    Ok(RoutingDecision {
        route: raw.route.parse::<Route>()?,
        internal_prediction: from_json_opt(raw.internal_prediction, "internal_prediction")?,
        external_prediction: from_json_opt(raw.external_prediction, "external_prediction")?,
        fusion: from_json_opt(raw.fusion, "fusion")?,
        evidence: from_json_opt(raw.evidence, "evidence")?,
        created_at: parse_dt(&raw.created_at)?,
        id: raw.id,
        request_id: raw.request_id,
        confidence: raw.confidence,
        reasoning: raw.reasoning,
        agreement_score: raw.agreement_score,
        inference_time_ms: raw.inference_time_ms.max(0) as u64,
        model_version: raw.model_version,
    })
}
