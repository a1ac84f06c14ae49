use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DamagePrediction, FusionResult, NormalizedEvidence};
use crate::errors::SurveyorError;

/// Which predictor(s) execute for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Internal,
    External,
    Hybrid,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Internal, Route::External, Route::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = SurveyorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| SurveyorError::InvalidInput {
                field: "route".to_string(),
                reason: format!("unknown route '{s}'"),
            })
    }
}

/// Record of one routing decision. Never mutated after creation; calibration
/// outcomes are stored alongside, not inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub id: String,
    pub request_id: String,
    pub route: Route,
    /// Internal confidence the decision was based on.
    pub confidence: f64,
    /// Human-readable reasoning tag.
    pub reasoning: String,
    pub internal_prediction: Option<DamagePrediction>,
    pub external_prediction: Option<DamagePrediction>,
    /// 0–100, present only on the hybrid route.
    pub agreement_score: Option<f64>,
    pub inference_time_ms: u64,
    /// Version of the active internal model at dispatch time.
    pub model_version: Option<String>,
    pub fusion: Option<FusionResult>,
    pub evidence: Option<NormalizedEvidence>,
    pub created_at: DateTime<Utc>,
}

impl RoutingDecision {
    /// The prediction that is returned as the assessment of record.
    pub fn prediction_of_record(&self) -> Option<&DamagePrediction> {
        match self.route {
            Route::Internal => self.internal_prediction.as_ref(),
            Route::External | Route::Hybrid => self
                .external_prediction
                .as_ref()
                .or(self.internal_prediction.as_ref()),
        }
    }
}
