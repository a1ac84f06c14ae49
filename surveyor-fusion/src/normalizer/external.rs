use surveyor_core::models::{EvidenceItem, EvidenceSource, ExternalAssessorEvidence};

use super::in_unit_range;

/// Severity maps to probability through the fixed table on `Severity`;
/// the 0–100 confidence is rescaled to [0, 1].
pub fn normalize_external(raw: &ExternalAssessorEvidence) -> Option<EvidenceItem> {
    let probability = raw.severity.damage_probability();
    let confidence = raw.confidence / 100.0;
    in_unit_range(probability, confidence)
        .then(|| EvidenceItem::observed(EvidenceSource::ExternalAssessor, probability, confidence))
}

#[cfg(test)]
mod tests {
    use surveyor_core::models::Severity;

    use super::*;

    fn assessor(severity: Severity, confidence: f64) -> ExternalAssessorEvidence {
        ExternalAssessorEvidence {
            severity,
            confidence,
            damage_type: "water_damage".to_string(),
            has_critical_hazards: false,
        }
    }

    #[test]
    fn critical_maps_high() {
        let item = normalize_external(&assessor(Severity::Critical, 95.0)).unwrap();
        assert!(item.probability >= 0.95);
        assert!((item.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn confidence_over_100_rejected() {
        assert!(normalize_external(&assessor(Severity::Early, 140.0)).is_none());
        assert!(normalize_external(&assessor(Severity::Early, -1.0)).is_none());
    }
}
