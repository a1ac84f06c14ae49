use std::io::Write;

use surveyor_core::config::FusionConfig;
use surveyor_core::models::{
    EvidenceItem, EvidenceSource, EvidenceWeights, ExternalAssessorEvidence, NormalizedEvidence,
    RawEvidence, Severity, UncertaintyLevel,
};
use surveyor_fusion::FusionEngine;

fn equal_weight_engine() -> FusionEngine {
    FusionEngine::new(FusionConfig {
        default_weights: EvidenceWeights::equal(),
        ..FusionConfig::default()
    })
}

fn three_sources() -> NormalizedEvidence {
    NormalizedEvidence::from_items([
        EvidenceItem::observed(EvidenceSource::Segmentation, 0.9, 0.9),
        EvidenceItem::observed(EvidenceSource::ExternalAssessor, 0.8, 0.7),
        EvidenceItem::observed(EvidenceSource::StructuralGraph, 0.85, 0.8),
    ])
}

#[test]
fn three_agreeing_sources_low_uncertainty() {
    let result = equal_weight_engine().fuse(&three_sources());
    assert!((result.mean - 0.85).abs() < 1e-9);
    assert_eq!(result.uncertainty_level, UncertaintyLevel::Low);
    assert_eq!(result.sources_available, 3);
    assert!(!result.degraded);

    let expected_epistemic = (0.01 + 0.04 + 0.02) / 9.0;
    assert!((result.epistemic_variance - expected_epistemic).abs() < 1e-12);
    assert!((result.variance - result.epistemic_variance - result.aleatoric_variance).abs() < 1e-15);

    let (lo, hi) = result.confidence_interval;
    assert!(lo <= result.mean && result.mean <= hi);
}

#[test]
fn no_evidence_is_neutral_and_high_uncertainty() {
    let result = FusionEngine::default().fuse(&NormalizedEvidence::empty());
    assert!((result.mean - 0.5).abs() < 1e-12);
    assert_eq!(result.uncertainty_level, UncertaintyLevel::High);
    assert_eq!(result.weights_used, EvidenceWeights::equal());
    assert_eq!(result.sources_available, 0);
}

#[test]
fn external_only_critical_is_high_probability() {
    let engine = FusionEngine::default();
    let raw = RawEvidence {
        external_assessor: Some(ExternalAssessorEvidence {
            severity: Severity::Critical,
            confidence: 95.0,
            damage_type: "structural_deformation".to_string(),
            has_critical_hazards: true,
        }),
        ..RawEvidence::default()
    };
    let (evidence, result) = engine.fuse_raw(&raw);
    assert_eq!(evidence.available_count(), 1);
    assert!(result.mean >= 0.95);
    assert_eq!(result.weights_used.external_assessor, 1.0);
    assert_eq!(result.weights_used.segmentation, 0.0);
}

#[test]
fn malformed_evidence_falls_back_to_conservative() {
    let engine = FusionEngine::default();
    let evidence = NormalizedEvidence::from_items([EvidenceItem::observed(
        EvidenceSource::Segmentation,
        f64::NAN,
        0.9,
    )]);
    assert!(engine.try_fuse(&evidence).is_err());

    let result = engine.fuse(&evidence);
    assert!(result.degraded);
    assert_eq!(result.mean, 0.5);
    assert_eq!(result.variance, 0.25);
    assert_eq!(result.confidence_interval, (0.0, 1.0));
    assert_eq!(result.uncertainty_level, UncertaintyLevel::High);
    assert!(result.weights_used.is_all_zero());
}

#[test]
fn fusion_is_deterministic() {
    let engine = FusionEngine::default();
    let a = engine.fuse(&three_sources());
    let b = engine.fuse(&three_sources());
    assert_eq!(a.mean.to_bits(), b.mean.to_bits());
    assert_eq!(a.variance.to_bits(), b.variance.to_bits());
}

#[test]
fn weight_file_loaded_and_reloaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"sam3": 0.6, "gpt4": 0.2, "sceneGraph": 0.2}}"#).unwrap();

    let engine = FusionEngine::new(FusionConfig {
        weights_path: Some(file.path().to_path_buf()),
        ..FusionConfig::default()
    });
    assert_eq!(engine.base_weights(), EvidenceWeights::new(0.6, 0.2, 0.2));

    std::fs::write(
        file.path(),
        r#"{"segmentation": 0.1, "external_assessor": 0.1, "structural_graph": 0.8}"#,
    )
    .unwrap();
    assert_eq!(engine.base_weights(), EvidenceWeights::new(0.6, 0.2, 0.2), "cached until reload");
    assert_eq!(engine.reload_weights(), EvidenceWeights::new(0.1, 0.1, 0.8));
}

#[test]
fn invalid_weight_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"sam3": -1.0, "gpt4": 0.5, "sceneGraph": 0.5}}"#).unwrap();
    let engine = FusionEngine::new(FusionConfig {
        weights_path: Some(file.path().to_path_buf()),
        ..FusionConfig::default()
    });
    assert_eq!(engine.base_weights(), FusionConfig::default().default_weights);

    let missing = FusionEngine::new(FusionConfig {
        weights_path: Some("/nonexistent/weights.json".into()),
        ..FusionConfig::default()
    });
    assert_eq!(missing.base_weights(), FusionConfig::default().default_weights);
}
