use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NormalizedEvidence, Route, Severity, Urgency};

/// Ground-truth outcome attached to a past routing decision. Append-only;
/// the newest record for a decision is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub id: i64,
    pub routing_decision_id: String,
    pub was_correct: bool,
    pub actual_severity: Severity,
    pub actual_urgency: Urgency,
    pub validated_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input to `record_outcome`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub routing_decision_id: String,
    pub was_correct: bool,
    pub actual_severity: Severity,
    pub actual_urgency: Urgency,
    #[serde(default)]
    pub validated_by: Option<String>,
}

/// A decision joined with its latest outcome, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedDecision {
    pub decision_id: String,
    pub route: Route,
    pub confidence: f64,
    pub inference_time_ms: u64,
    pub was_correct: Option<bool>,
    pub evidence: Option<NormalizedEvidence>,
    pub created_at: DateTime<Utc>,
}

/// Per-route aggregate over decisions and their latest outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    pub route: Route,
    pub decisions: usize,
    pub validated: usize,
    pub correct: usize,
    pub avg_inference_time_ms: f64,
}

impl RouteStats {
    pub fn accuracy(&self) -> Option<f64> {
        (self.validated > 0).then(|| self.correct as f64 / self.validated as f64)
    }
}
