//! Base weight loading and per-request renormalization.

use std::path::Path;

use surveyor_core::errors::{FusionError, SurveyorResult};
use surveyor_core::models::{EvidenceSource, EvidenceWeights, NormalizedEvidence};

/// Read and validate a weight file written by the offline weight trainer.
pub fn load_weights_file(path: &Path) -> SurveyorResult<EvidenceWeights> {
    let raw = std::fs::read_to_string(path)?;
    let weights: EvidenceWeights = serde_json::from_str(&raw)?;
    validate(&weights)?;
    Ok(weights)
}

/// Every weight finite and non-negative, sum positive.
pub fn validate(weights: &EvidenceWeights) -> Result<(), FusionError> {
    for source in EvidenceSource::ALL {
        let w = weights.get(source);
        if !w.is_finite() || w < 0.0 {
            return Err(FusionError::InvalidWeights {
                reason: format!("{source} weight {w} is not a finite non-negative number"),
            });
        }
    }
    if weights.sum() <= 0.0 {
        return Err(FusionError::InvalidWeights {
            reason: "weights sum to zero".to_string(),
        });
    }
    Ok(())
}

/// Zero the weights of absent sources and rescale the rest to sum to 1.
/// With no source available, every source gets an equal share.
pub fn renormalize(base: &EvidenceWeights, evidence: &NormalizedEvidence) -> EvidenceWeights {
    let mut weights = EvidenceWeights::zero();
    for item in evidence.iter().filter(|i| i.available) {
        weights.set(item.source, base.get(item.source));
    }

    let sum = weights.sum();
    if sum <= 0.0 || !sum.is_finite() {
        return EvidenceWeights::equal();
    }
    for source in EvidenceSource::ALL {
        weights.set(source, weights.get(source) / sum);
    }
    weights
}

/// Share of the base weight carried by available sources, in [0, 1].
pub fn coverage(base: &EvidenceWeights, evidence: &NormalizedEvidence) -> f64 {
    let total = base.sum();
    if total <= 0.0 {
        return 0.0;
    }
    let present: f64 = evidence
        .iter()
        .filter(|i| i.available)
        .map(|i| base.get(i.source))
        .sum();
    (present / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use surveyor_core::models::EvidenceItem;

    use super::*;

    #[test]
    fn absent_sources_get_zero_weight() {
        let base = EvidenceWeights::new(0.4, 0.35, 0.25);
        let evidence = NormalizedEvidence::from_items([
            EvidenceItem::observed(EvidenceSource::Segmentation, 0.9, 0.9),
            EvidenceItem::observed(EvidenceSource::StructuralGraph, 0.5, 0.5),
        ]);
        let w = renormalize(&base, &evidence);
        assert_eq!(w.external_assessor, 0.0);
        assert!((w.segmentation - 0.4 / 0.65).abs() < 1e-12);
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_sources_fall_back_to_equal() {
        let w = renormalize(&EvidenceWeights::new(0.4, 0.35, 0.25), &NormalizedEvidence::empty());
        assert_eq!(w, EvidenceWeights::equal());
    }

    #[test]
    fn available_source_with_zero_base_weight_falls_back() {
        let base = EvidenceWeights::new(0.0, 1.0, 0.0);
        let evidence = NormalizedEvidence::from_items([EvidenceItem::observed(
            EvidenceSource::Segmentation,
            0.9,
            0.9,
        )]);
        assert_eq!(renormalize(&base, &evidence), EvidenceWeights::equal());
    }

    #[test]
    fn coverage_is_base_share() {
        let base = EvidenceWeights::new(0.4, 0.35, 0.25);
        let evidence = NormalizedEvidence::from_items([EvidenceItem::observed(
            EvidenceSource::Segmentation,
            0.9,
            0.9,
        )]);
        assert!((coverage(&base, &evidence) - 0.4).abs() < 1e-12);
        assert_eq!(coverage(&base, &NormalizedEvidence::empty()), 0.0);
    }

    #[test]
    fn negative_weight_invalid() {
        assert!(validate(&EvidenceWeights::new(-0.1, 0.5, 0.6)).is_err());
        assert!(validate(&EvidenceWeights::zero()).is_err());
        assert!(validate(&EvidenceWeights::new(f64::NAN, 0.5, 0.6)).is_err());
        assert!(validate(&EvidenceWeights::new(0.0, 0.0, 1.0)).is_ok());
    }
}
