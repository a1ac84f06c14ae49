use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use surveyor_calibration::CalibrationEngine;
use surveyor_core::config::RoutingConfig;
use surveyor_core::models::{
    EvidenceItem, EvidenceSource, NormalizedEvidence, OutcomeReport, Route, RoutingDecision,
    Severity, Urgency,
};
use surveyor_core::traits::{ICalibrationStorage, IDecisionStorage};
use surveyor_core::SurveyorError;
use surveyor_storage::StorageEngine;

fn setup() -> (Arc<StorageEngine>, CalibrationEngine) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = CalibrationEngine::new(storage.clone(), RoutingConfig::default());
    (storage, engine)
}

fn store_decision(storage: &StorageEngine, id: &str, route: Route, confidence: f64) {
    store_decision_at(storage, id, route, confidence, Utc::now());
}

fn store_decision_at(
    storage: &StorageEngine,
    id: &str,
    route: Route,
    confidence: f64,
    created_at: DateTime<Utc>,
) {
    storage
        .insert_decision(&RoutingDecision {
            id: id.to_string(),
            request_id: format!("req-{id}"),
            route,
            confidence,
            reasoning: "test".to_string(),
            internal_prediction: None,
            external_prediction: None,
            agreement_score: None,
            inference_time_ms: 100,
            model_version: None,
            fusion: None,
            evidence: Some(NormalizedEvidence::from_items([
                EvidenceItem::observed(EvidenceSource::Segmentation, 0.8, 0.9),
                EvidenceItem::observed(EvidenceSource::StructuralGraph, 0.6, 0.7),
            ])),
            created_at,
        })
        .unwrap();
}

fn outcome(id: &str, was_correct: bool) -> OutcomeReport {
    OutcomeReport {
        routing_decision_id: id.to_string(),
        was_correct,
        actual_severity: Severity::Full,
        actual_urgency: Urgency::Soon,
        validated_by: None,
    }
}

#[test]
fn record_outcome_requires_existing_decision() {
    let (_, engine) = setup();
    let err = engine.record_outcome(&outcome("missing", true)).unwrap_err();
    assert!(matches!(err, SurveyorError::DecisionNotFound { .. }));
}

#[test]
fn last_outcome_is_authoritative_and_decision_untouched() {
    let (storage, engine) = setup();
    store_decision(&storage, "d1", Route::Internal, 0.9);
    engine.record_outcome(&outcome("d1", false)).unwrap();
    let second = engine.record_outcome(&outcome("d1", true)).unwrap();

    assert_eq!(storage.latest_outcome("d1").unwrap().unwrap().id, second.id);
    let report = engine.report(None).unwrap();
    assert_eq!(report.validated, 1);
    assert_eq!(report.overall_accuracy, Some(1.0));

    let decision = storage.get_decision("d1").unwrap().unwrap();
    assert_eq!(decision.reasoning, "test");
}

#[test]
fn report_tolerates_unvalidated_decisions() {
    let (storage, engine) = setup();
    store_decision(&storage, "a", Route::Internal, 0.95);
    store_decision(&storage, "b", Route::External, 0.3);
    store_decision(&storage, "c", Route::Hybrid, 0.75);
    engine.record_outcome(&outcome("a", true)).unwrap();

    let report = engine.report(None).unwrap();
    assert_eq!(report.total_decisions, 3);
    assert_eq!(report.unvalidated, 2);
    assert_eq!(report.buckets[9].decisions, 1);
    assert_eq!(report.buckets[9].accuracy(), Some(1.0));
    assert_eq!(report.buckets[3].accuracy(), None);
    assert_eq!(report.routes.len(), 3);
    assert!((report.avg_inference_time_ms - 100.0).abs() < 1e-9);
}

#[test]
fn report_since_scopes_buckets_and_routes_alike() {
    let (storage, engine) = setup();
    let old = Utc::now() - Duration::days(30);
    store_decision_at(&storage, "old-ext", Route::External, 0.3, old);
    store_decision_at(&storage, "old-int", Route::Internal, 0.95, old);
    store_decision(&storage, "new-int", Route::Internal, 0.95);
    engine.record_outcome(&outcome("old-int", false)).unwrap();
    engine.record_outcome(&outcome("new-int", true)).unwrap();

    let report = engine
        .report(Some(Utc::now() - Duration::days(7)))
        .unwrap();
    assert_eq!(report.total_decisions, 1);
    assert_eq!(report.overall_accuracy, Some(1.0));
    assert_eq!(report.routes.len(), 1);
    let internal = &report.routes[0];
    assert_eq!(internal.route, Route::Internal);
    assert_eq!(internal.decisions, 1);
    assert_eq!(internal.validated, 1);
    assert_eq!(internal.correct, 1);

    let all = engine.report(None).unwrap();
    assert_eq!(all.total_decisions, 3);
    assert_eq!(all.routes.len(), 2);
}

#[test]
fn recommends_thresholds_from_history() {
    let (storage, engine) = setup();
    for i in 0..10 {
        let id = format!("hi-{i}");
        store_decision(&storage, &id, Route::Internal, 0.92);
        engine.record_outcome(&outcome(&id, true)).unwrap();
    }
    for i in 0..10 {
        let id = format!("mid-{i}");
        store_decision(&storage, &id, Route::Hybrid, 0.75);
        engine.record_outcome(&outcome(&id, i < 9)).unwrap();
    }

    let rec = engine.recommend_thresholds(0.95, 5).unwrap();
    assert!((rec.high_confidence_threshold.unwrap() - 0.9).abs() < 1e-12);
    assert!((rec.medium_confidence_threshold.unwrap() - 0.7).abs() < 1e-12);
    assert_eq!(rec.current_high, 0.85);

    assert!(engine.recommend_thresholds(1.5, 5).is_err());
}

#[test]
fn exports_training_csv() {
    let (storage, engine) = setup();
    store_decision(&storage, "a", Route::Internal, 0.9);
    store_decision(&storage, "b", Route::Internal, 0.9);
    engine.record_outcome(&outcome("a", false)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("shadow-mode-predictions.csv");
    let rows = engine.export_fusion_training_csv(&path, None).unwrap();
    assert_eq!(rows, 1);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "sam3_confidence,gpt4_confidence,scene_graph_score,y_true");
    assert_eq!(lines[1], "0.800000,0.500000,0.600000,0");
}
