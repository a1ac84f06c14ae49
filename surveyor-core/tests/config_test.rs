use surveyor_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = SurveyorConfig::from_toml("").unwrap();

    // Storage defaults
    assert_eq!(config.storage.db_path, "surveyor.db");
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.storage.busy_timeout_ms, 5_000);

    // Fusion defaults
    assert!(config.fusion.weights_path.is_none());
    assert_eq!(config.fusion.default_weights.segmentation, 0.40);
    assert_eq!(config.fusion.default_weights.external_assessor, 0.35);
    assert_eq!(config.fusion.default_weights.structural_graph, 0.25);
    assert_eq!(config.fusion.interval_sigmas, 2.0);
    assert!(config.fusion.source_variances.segmentation < config.fusion.source_variances.structural_graph);
    assert!(
        config.fusion.source_variances.structural_graph
            < config.fusion.source_variances.external_assessor
    );

    // Routing defaults
    assert_eq!(config.routing.high_confidence_threshold, 0.85);
    assert_eq!(config.routing.medium_confidence_threshold, 0.70);
    assert!(config.routing.internal_routing_enabled);

    // Retraining defaults
    assert_eq!(config.retraining.min_corrections, 100);
    assert_eq!(config.retraining.max_corrections, 1_000);
    assert_eq!(config.retraining.retraining_interval_days, 7);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[routing]
high_confidence_threshold = 0.9
internal_routing_enabled = false

[retraining]
min_corrections = 25

[fusion.default_weights]
sam3 = 0.5
gpt4 = 0.3
sceneGraph = 0.2
"#;
    let config = SurveyorConfig::from_toml(toml).unwrap();
    assert_eq!(config.routing.high_confidence_threshold, 0.9);
    assert!(!config.routing.internal_routing_enabled);
    // Non-overridden fields keep defaults
    assert_eq!(config.routing.medium_confidence_threshold, 0.70);
    assert_eq!(config.retraining.min_corrections, 25);
    assert_eq!(config.retraining.max_corrections, 1_000);
    assert_eq!(config.fusion.default_weights.segmentation, 0.5);
    assert_eq!(config.fusion.default_weights.structural_graph, 0.2);
}

#[test]
fn config_rejects_inverted_thresholds() {
    let toml = r#"
[routing]
high_confidence_threshold = 0.6
medium_confidence_threshold = 0.8
"#;
    let err = SurveyorConfig::from_toml(toml).unwrap_err();
    assert!(err.to_string().contains("exceeds high threshold"));
}

#[test]
fn config_rejects_malformed_toml() {
    let err = SurveyorConfig::from_toml("[routing\nhigh = ").unwrap_err();
    assert!(matches!(err, surveyor_core::SurveyorError::TomlError(_)));
}

#[test]
fn config_serde_roundtrip() {
    let config = SurveyorConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = SurveyorConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(
        roundtripped.fusion.default_weights,
        config.fusion.default_weights
    );
    assert_eq!(
        roundtripped.retraining.class_names,
        config.retraining.class_names
    );
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surveyor.toml");
    std::fs::write(&path, "[storage]\ndb_path = \"/var/lib/surveyor.db\"\n").unwrap();
    let config = SurveyorConfig::from_file(&path).unwrap();
    assert_eq!(config.storage.db_path, "/var/lib/surveyor.db");
}
