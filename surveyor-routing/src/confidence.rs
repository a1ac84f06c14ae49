//! Internal-confidence estimation from the fused estimate.

use surveyor_core::models::{EvidenceWeights, FusionResult, NormalizedEvidence};
use surveyor_fusion::weights::coverage;

/// Maps a fused estimate to the confidence the routing thresholds compare against.
pub trait ConfidenceEstimator: Send + Sync {
    fn estimate(
        &self,
        fusion: &FusionResult,
        evidence: &NormalizedEvidence,
        base_weights: &EvidenceWeights,
    ) -> f64;
}

/// `(1 − σ) × coverage`, where coverage is the share of base weight carried
/// by the sources that reported. Degraded fusion yields zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageConfidenceEstimator;

impl ConfidenceEstimator for CoverageConfidenceEstimator {
    fn estimate(
        &self,
        fusion: &FusionResult,
        evidence: &NormalizedEvidence,
        base_weights: &EvidenceWeights,
    ) -> f64 {
        if fusion.degraded || evidence.is_empty() {
            return 0.0;
        }
        let certainty = (1.0 - fusion.std_dev()).clamp(0.0, 1.0);
        (certainty * coverage(base_weights, evidence)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use surveyor_core::models::{EvidenceItem, EvidenceSource};
    use surveyor_fusion::FusionEngine;

    use super::*;

    #[test]
    fn full_agreement_is_confident() {
        let engine = FusionEngine::default();
        let evidence = NormalizedEvidence::from_items([
            EvidenceItem::observed(EvidenceSource::Segmentation, 0.9, 0.9),
            EvidenceItem::observed(EvidenceSource::ExternalAssessor, 0.8, 0.7),
            EvidenceItem::observed(EvidenceSource::StructuralGraph, 0.85, 0.8),
        ]);
        let fusion = engine.fuse(&evidence);
        let c = CoverageConfidenceEstimator.estimate(&fusion, &evidence, &engine.base_weights());
        assert!(c >= 0.85, "got {c}");
    }

    #[test]
    fn missing_sources_reduce_confidence() {
        let engine = FusionEngine::default();
        let evidence = NormalizedEvidence::from_items([EvidenceItem::observed(
            EvidenceSource::Segmentation,
            0.9,
            0.95,
        )]);
        let fusion = engine.fuse(&evidence);
        let c = CoverageConfidenceEstimator.estimate(&fusion, &evidence, &engine.base_weights());
        assert!(c < 0.45, "got {c}");
    }

    #[test]
    fn no_evidence_is_zero() {
        let engine = FusionEngine::default();
        let evidence = NormalizedEvidence::empty();
        let fusion = engine.fuse(&evidence);
        assert_eq!(
            CoverageConfidenceEstimator.estimate(&fusion, &evidence, &engine.base_weights()),
            0.0
        );
    }
}
