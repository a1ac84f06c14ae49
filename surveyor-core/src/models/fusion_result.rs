use std::fmt;

use serde::{Deserialize, Serialize};

use super::EvidenceWeights;

/// Discrete uncertainty label derived from the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyLevel {
    Low,
    Medium,
    High,
}

impl UncertaintyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for UncertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posterior damage estimate for one request. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    /// Posterior mean damage probability.
    pub mean: f64,
    /// Total variance: epistemic + aleatoric.
    pub variance: f64,
    pub epistemic_variance: f64,
    pub aleatoric_variance: f64,
    /// `[lo, hi]`, both within [0, 1], `lo <= mean <= hi`.
    pub confidence_interval: (f64, f64),
    pub uncertainty_level: UncertaintyLevel,
    /// Normalized weights actually applied.
    pub weights_used: EvidenceWeights,
    /// Number of sources that contributed evidence.
    pub sources_available: usize,
    /// Set when this is the conservative fallback rather than a real estimate.
    pub degraded: bool,
}

impl FusionResult {
    /// Maximally conservative estimate returned when fusion fails.
    pub fn conservative() -> Self {
        Self {
            mean: 0.5,
            variance: 0.25,
            epistemic_variance: 0.0,
            aleatoric_variance: 0.25,
            confidence_interval: (0.0, 1.0),
            uncertainty_level: UncertaintyLevel::High,
            weights_used: EvidenceWeights::zero(),
            sources_available: 0,
            degraded: true,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}
