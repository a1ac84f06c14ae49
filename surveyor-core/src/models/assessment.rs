use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RawEvidence;
use crate::errors::SurveyorError;

/// Damage severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Early,
    Midway,
    Full,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Early,
        Severity::Midway,
        Severity::Full,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Midway => "midway",
            Self::Full => "full",
            Self::Critical => "critical",
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Self::Early => 0,
            Self::Midway => 1,
            Self::Full => 2,
            Self::Critical => 3,
        }
    }

    /// Severity-to-probability mapping used when normalizing assessor output.
    pub fn damage_probability(self) -> f64 {
        match self {
            Self::Early => 0.30,
            Self::Midway => 0.60,
            Self::Full => 0.85,
            Self::Critical => 0.97,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SurveyorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SurveyorError::InvalidInput {
                field: "severity".to_string(),
                reason: format!("unknown severity '{s}'"),
            })
    }
}

/// How soon remediation is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Monitor,
    Planned,
    Soon,
    Urgent,
    Immediate,
}

impl Urgency {
    pub const ALL: [Urgency; 5] = [
        Urgency::Monitor,
        Urgency::Planned,
        Urgency::Soon,
        Urgency::Urgent,
        Urgency::Immediate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::Planned => "planned",
            Self::Soon => "soon",
            Self::Urgent => "urgent",
            Self::Immediate => "immediate",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = SurveyorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SurveyorError::InvalidInput {
                field: "urgency".to_string(),
                reason: format!("unknown urgency '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Industrial,
}

/// Context the safety override inspects before any confidence rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyContext {
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub has_critical_hazards: bool,
}

/// A severity/urgency judgment from either predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagePrediction {
    pub severity: Severity,
    pub damage_type: String,
    /// Predictor confidence on a 0–100 scale.
    pub confidence: f64,
    pub urgency: Urgency,
    /// Probability of damage in [0, 1].
    pub damage_probability: f64,
}

/// One assessment request entering the router.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub request_id: String,
    #[serde(default)]
    pub image_refs: Vec<String>,
    #[serde(default)]
    pub evidence: RawEvidence,
    #[serde(default)]
    pub safety: SafetyContext,
}
