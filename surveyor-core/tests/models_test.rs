use surveyor_core::models::*;

#[test]
fn neutral_evidence_is_maximal_ignorance() {
    let item = EvidenceItem::neutral(EvidenceSource::StructuralGraph);
    assert_eq!(item.probability, 0.5);
    assert_eq!(item.confidence, 0.0);
    assert!(!item.available);
}

#[test]
fn normalized_evidence_covers_every_source() {
    let evidence = NormalizedEvidence::from_items([EvidenceItem::observed(
        EvidenceSource::ExternalAssessor,
        0.9,
        0.8,
    )]);
    assert_eq!(evidence.available_count(), 1);
    assert_eq!(evidence.iter().count(), 3);
    assert!(evidence.get(EvidenceSource::ExternalAssessor).available);
    assert!(!evidence.get(EvidenceSource::Segmentation).available);
}

#[test]
fn weights_accept_trainer_aliases() {
    let json = r#"{"sam3": 0.5, "gpt4": 0.3, "sceneGraph": 0.2}"#;
    let weights: EvidenceWeights = serde_json::from_str(json).unwrap();
    assert_eq!(weights.get(EvidenceSource::Segmentation), 0.5);
    assert_eq!(weights.get(EvidenceSource::ExternalAssessor), 0.3);
    assert_eq!(weights.get(EvidenceSource::StructuralGraph), 0.2);
}

#[test]
fn lenient_parse_drops_only_the_malformed_source() {
    let value = serde_json::json!({
        "segmentation": {"damage_types": "not a map", "overall_confidence": 0.9},
        "external_assessor": {
            "severity": "critical",
            "confidence": 95.0,
            "damage_type": "structural_crack",
            "has_critical_hazards": true
        }
    });
    let raw = RawEvidence::from_json_lenient(&value);
    assert!(raw.segmentation.is_none());
    assert!(raw.structural_graph.is_none());
    assert!(raw.flags_critical_hazard());
}

#[test]
fn severity_ordering_and_probability_are_monotonic() {
    let probs: Vec<f64> = Severity::ALL.iter().map(|s| s.damage_probability()).collect();
    assert!(probs.windows(2).all(|w| w[0] < w[1]));
    assert!(Severity::Early < Severity::Critical);
    assert_eq!("full".parse::<Severity>().unwrap(), Severity::Full);
    assert!("catastrophic".parse::<Severity>().is_err());
}

#[test]
fn route_roundtrips_through_str() {
    for route in Route::ALL {
        assert_eq!(route.as_str().parse::<Route>().unwrap(), route);
    }
}

#[test]
fn job_status_transitions() {
    use RetrainingJobStatus::*;
    assert!(Pending.can_transition_to(Running));
    assert!(Running.can_transition_to(Completed));
    assert!(Running.can_transition_to(Failed));
    assert!(!Completed.can_transition_to(Failed));
    assert!(!Failed.can_transition_to(Running));
    assert!(Completed.is_terminal() && Failed.is_terminal());
}

#[test]
fn conservative_fusion_result_is_maximally_uncertain() {
    let r = FusionResult::conservative();
    assert_eq!(r.mean, 0.5);
    assert_eq!(r.variance, 0.25);
    assert_eq!(r.confidence_interval, (0.0, 1.0));
    assert_eq!(r.uncertainty_level, UncertaintyLevel::High);
    assert!(r.weights_used.is_all_zero());
    assert!(r.degraded);
}

#[test]
fn yolo_box_formats_label_line() {
    let b = YoloBox {
        class_id: 2,
        cx: 0.5,
        cy: 0.25,
        width: 0.1,
        height: 0.2,
    };
    assert_eq!(b.to_label_line(), "2 0.500000 0.250000 0.100000 0.200000");
    assert!(b.is_valid());
}
