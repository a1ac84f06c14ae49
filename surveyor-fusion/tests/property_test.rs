//! Invariants over arbitrary evidence: weight normalization, interval
//! ordering, and determinism.

use proptest::prelude::*;
use surveyor_core::models::{EvidenceItem, EvidenceSource, EvidenceWeights, NormalizedEvidence};
use surveyor_fusion::weights::renormalize;
use surveyor_fusion::FusionEngine;

fn arb_item(source: EvidenceSource) -> impl Strategy<Value = Option<EvidenceItem>> {
    prop::option::of((0.0f64..=1.0, 0.0f64..=1.0))
        .prop_map(move |o| o.map(|(p, c)| EvidenceItem::observed(source, p, c)))
}

fn arb_evidence() -> impl Strategy<Value = NormalizedEvidence> {
    (
        arb_item(EvidenceSource::Segmentation),
        arb_item(EvidenceSource::ExternalAssessor),
        arb_item(EvidenceSource::StructuralGraph),
    )
        .prop_map(|(a, b, c)| NormalizedEvidence::from_items([a, b, c].into_iter().flatten()))
}

fn arb_weights() -> impl Strategy<Value = EvidenceWeights> {
    (0.01f64..10.0, 0.01f64..10.0, 0.01f64..10.0)
        .prop_map(|(a, b, c)| EvidenceWeights::new(a, b, c))
}

proptest! {
    #[test]
    fn normalized_weights_sum_to_one(base in arb_weights(), evidence in arb_evidence()) {
        let w = renormalize(&base, &evidence);
        prop_assert!((w.sum() - 1.0).abs() < 1e-9);
        for source in EvidenceSource::ALL {
            prop_assert!(w.get(source) >= 0.0);
            if !evidence.is_empty() && !evidence.get(source).available {
                prop_assert_eq!(w.get(source), 0.0);
            }
        }
    }

    #[test]
    fn interval_brackets_mean(evidence in arb_evidence()) {
        let r = FusionEngine::default().fuse(&evidence);
        let (lo, hi) = r.confidence_interval;
        prop_assert!(r.variance >= 0.0);
        prop_assert!((0.0..=1.0).contains(&lo));
        prop_assert!((0.0..=1.0).contains(&hi));
        prop_assert!(lo <= r.mean && r.mean <= hi);
        prop_assert!(!r.degraded);
    }

    #[test]
    fn fusion_bit_identical(evidence in arb_evidence()) {
        let engine = FusionEngine::default();
        let a = engine.fuse(&evidence);
        let b = engine.fuse(&evidence);
        prop_assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        prop_assert_eq!(a.variance.to_bits(), b.variance.to_bits());
    }
}
