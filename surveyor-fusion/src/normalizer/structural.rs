use surveyor_core::constants::{STRUCTURAL_DAMAGE_SLICE, STRUCTURAL_FEATURE_DIM};
use surveyor_core::models::{EvidenceItem, EvidenceSource, StructuralGraphEvidence};

use super::in_unit_range;

/// Mean of the damage features (crack density, spalling, moisture,
/// deformation). The vector must have exactly the expected dimension.
pub fn normalize_structural(raw: &StructuralGraphEvidence) -> Option<EvidenceItem> {
    if raw.features.len() != STRUCTURAL_FEATURE_DIM {
        return None;
    }
    if !raw
        .features
        .iter()
        .all(|f| f.is_finite() && (0.0..=1.0).contains(f))
    {
        return None;
    }

    let slice = &raw.features[STRUCTURAL_DAMAGE_SLICE];
    let probability = slice.iter().sum::<f64>() / slice.len() as f64;
    let confidence = raw.avg_node_confidence;
    in_unit_range(probability, confidence)
        .then(|| EvidenceItem::observed(EvidenceSource::StructuralGraph, probability, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_damage_slice() {
        let mut features = vec![0.0; STRUCTURAL_FEATURE_DIM];
        features[..4].copy_from_slice(&[0.8, 0.6, 0.4, 0.2]);
        features[10] = 1.0;
        let item = normalize_structural(&StructuralGraphEvidence {
            features,
            avg_node_confidence: 0.75,
        })
        .unwrap();
        assert!((item.probability - 0.5).abs() < 1e-12);
        assert_eq!(item.confidence, 0.75);
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(normalize_structural(&StructuralGraphEvidence {
            features: vec![0.5; 5],
            avg_node_confidence: 0.9,
        })
        .is_none());
    }
}
