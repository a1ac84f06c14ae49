use surveyor_core::models::{EvidenceItem, EvidenceSource, SegmentationEvidence};

use super::in_unit_range;

/// Instance-count-weighted mean of per-type confidences. A type reported
/// with zero instances still counts once. No types at all is an observation
/// of "no damage" at the reported overall confidence.
pub fn normalize_segmentation(raw: &SegmentationEvidence) -> Option<EvidenceItem> {
    let (weighted, total) = raw
        .damage_types
        .values()
        .fold((0.0_f64, 0.0_f64), |(sum, n), det| {
            let count = f64::from(det.instance_count.max(1));
            (sum + det.confidence * count, n + count)
        });

    let probability = if total > 0.0 { weighted / total } else { 0.0 };
    let confidence = raw.overall_confidence;

    let per_type_ok = raw
        .damage_types
        .values()
        .all(|d| d.confidence.is_finite() && (0.0..=1.0).contains(&d.confidence));
    (per_type_ok && in_unit_range(probability, confidence))
        .then(|| EvidenceItem::observed(EvidenceSource::Segmentation, probability, confidence))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use surveyor_core::models::DamageTypeDetection;

    use super::*;

    fn seg(types: &[(&str, f64, u32)], overall: f64) -> SegmentationEvidence {
        SegmentationEvidence {
            damage_types: types
                .iter()
                .map(|(name, confidence, instance_count)| {
                    (
                        name.to_string(),
                        DamageTypeDetection {
                            confidence: *confidence,
                            instance_count: *instance_count,
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
            overall_confidence: overall,
        }
    }

    #[test]
    fn weights_by_instance_count() {
        let item = normalize_segmentation(&seg(&[("crack", 0.9, 3), ("mold", 0.5, 1)], 0.8)).unwrap();
        assert!((item.probability - 0.8).abs() < 1e-12);
        assert_eq!(item.confidence, 0.8);
        assert!(item.available);
    }

    #[test]
    fn zero_instances_count_once() {
        let item = normalize_segmentation(&seg(&[("crack", 0.6, 0)], 0.7)).unwrap();
        assert!((item.probability - 0.6).abs() < 1e-12);
    }

    #[test]
    fn no_types_means_no_damage() {
        let item = normalize_segmentation(&seg(&[], 0.9)).unwrap();
        assert_eq!(item.probability, 0.0);
        assert_eq!(item.confidence, 0.9);
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(normalize_segmentation(&seg(&[("crack", 1.4, 1)], 0.9)).is_none());
        assert!(normalize_segmentation(&seg(&[("crack", 0.4, 1)], f64::NAN)).is_none());
    }
}
