//! Read-only projections: route distribution, accuracy inputs, inference time.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use surveyor_core::errors::SurveyorResult;
use surveyor_core::models::{Route, RouteStats};

use super::calibration_ops::LATEST_OUTCOME_JOIN;
use super::fmt_dt;
use crate::to_storage_err;

/// Per-route decision counts, validated/correct counts (latest outcome only),
/// and average inference time, optionally over decisions created at or after
/// `since`. Routes with no decisions are omitted.
pub fn route_stats(
    conn: &Connection,
    since: Option<DateTime<Utc>>,
) -> SurveyorResult<Vec<RouteStats>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT d.route,
                    COUNT(*),
                    COUNT(c.id),
                    COALESCE(SUM(c.was_correct), 0),
                    COALESCE(AVG(d.inference_time_ms), 0.0)
             FROM routing_decisions d
             {LATEST_OUTCOME_JOIN}
             WHERE ?1 IS NULL OR d.created_at >= ?1
             GROUP BY d.route
             ORDER BY d.route"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let since_str = since.as_ref().map(fmt_dt);
    let rows = stmt
        .query_map(params![since_str], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stats = Vec::new();
    for row in rows {
        let (route, decisions, validated, correct, avg_ms) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        stats.push(RouteStats {
            route: route.parse::<Route>()?,
            decisions: decisions as usize,
            validated: validated as usize,
            correct: correct as usize,
            avg_inference_time_ms: avg_ms,
        });
    }
    Ok(stats)
}

/// Total number of routing decisions.
pub fn decision_count(conn: &Connection) -> SurveyorResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM routing_decisions", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Average inference time across all decisions, 0.0 when there are none.
pub fn average_inference_time_ms(conn: &Connection) -> SurveyorResult<f64> {
    conn.query_row(
        "SELECT COALESCE(AVG(inference_time_ms), 0.0) FROM routing_decisions",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
