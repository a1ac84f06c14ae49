//! Variance decomposition, interval, and uncertainty label.

use surveyor_core::config::SourceVariances;
use surveyor_core::models::{EvidenceWeights, NormalizedEvidence, UncertaintyLevel};

/// `Σ wᵢ² σ²_sourceᵢ`: doubt about the weighting itself.
pub fn epistemic_variance(
    weights: &EvidenceWeights,
    priors: &SourceVariances,
    evidence: &NormalizedEvidence,
) -> f64 {
    evidence
        .iter()
        .map(|i| {
            let w = weights.get(i.source);
            w * w * priors.get(i.source)
        })
        .sum()
}

/// `Σ wᵢ² pᵢ(1−pᵢ)(1−cᵢ)`: noise intrinsic to this observation.
pub fn aleatoric_variance(weights: &EvidenceWeights, evidence: &NormalizedEvidence) -> f64 {
    evidence
        .iter()
        .map(|i| {
            let w = weights.get(i.source);
            w * w * i.probability * (1.0 - i.probability) * (1.0 - i.confidence)
        })
        .sum()
}

/// `[μ − kσ, μ + kσ]` clamped to [0, 1].
pub fn confidence_interval(mean: f64, std_dev: f64, sigmas: f64) -> (f64, f64) {
    let half = sigmas * std_dev;
    ((mean - half).clamp(0.0, 1.0), (mean + half).clamp(0.0, 1.0))
}

/// Coefficient of variation `σ/μ`, or `σ` alone when `μ = 0`.
pub fn uncertainty_level(mean: f64, std_dev: f64, low_cv: f64, medium_cv: f64) -> UncertaintyLevel {
    let cv = if mean > 0.0 { std_dev / mean } else { std_dev };
    if cv < low_cv {
        UncertaintyLevel::Low
    } else if cv < medium_cv {
        UncertaintyLevel::Medium
    } else {
        UncertaintyLevel::High
    }
}
