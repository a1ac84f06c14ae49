//! CalibrationEngine: outcome recording and read-only calibration views.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use surveyor_core::config::RoutingConfig;
use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::{CalibrationRecord, OutcomeReport};
use surveyor_core::traits::ICalibrationStorage;
use surveyor_observability::tracing_setup::events;

use crate::export::write_training_csv;
use crate::report::{build_report, CalibrationReport};
use crate::thresholds::{recommend, ThresholdRecommendation};

pub struct CalibrationEngine {
    storage: Arc<dyn ICalibrationStorage>,
    routing: RoutingConfig,
}

impl CalibrationEngine {
    /// `routing` supplies the thresholds currently in effect, reported
    /// alongside recommendations.
    pub fn new(storage: Arc<dyn ICalibrationStorage>, routing: RoutingConfig) -> Self {
        Self { storage, routing }
    }

    /// Append a ground-truth outcome. Repeated calls for the same decision
    /// append again; the newest outcome is authoritative.
    pub fn record_outcome(&self, report: &OutcomeReport) -> SurveyorResult<CalibrationRecord> {
        let _span = surveyor_observability::calibration_span!("record_outcome").entered();
        if report.routing_decision_id.trim().is_empty() {
            return Err(SurveyorError::InvalidInput {
                field: "routing_decision_id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let mut record = CalibrationRecord {
            id: 0,
            routing_decision_id: report.routing_decision_id.clone(),
            was_correct: report.was_correct,
            actual_severity: report.actual_severity,
            actual_urgency: report.actual_urgency,
            validated_by: report.validated_by.clone(),
            created_at: Utc::now(),
        };
        record.id = self.storage.insert_outcome(&record)?;
        events::outcome_recorded(&record.routing_decision_id, record.was_correct);
        Ok(record)
    }

    /// Accuracy by confidence bucket, per-route stats, inference time.
    pub fn report(&self, since: Option<DateTime<Utc>>) -> SurveyorResult<CalibrationReport> {
        let _span = surveyor_observability::calibration_span!("report").entered();
        let rows = self.storage.calibrated_decisions(since)?;
        let routes = self.storage.route_stats(since)?;
        Ok(build_report(&rows, routes))
    }

    /// Propose thresholds that would have met `target_accuracy` historically.
    pub fn recommend_thresholds(
        &self,
        target_accuracy: f64,
        min_samples: usize,
    ) -> SurveyorResult<ThresholdRecommendation> {
        if !target_accuracy.is_finite() || !(0.0..=1.0).contains(&target_accuracy) {
            return Err(SurveyorError::InvalidInput {
                field: "target_accuracy".to_string(),
                reason: format!("{target_accuracy} is not in [0, 1]"),
            });
        }
        let report = self.report(None)?;
        Ok(recommend(
            &report.buckets,
            target_accuracy,
            min_samples,
            self.routing.high_confidence_threshold,
            self.routing.medium_confidence_threshold,
        ))
    }

    /// Write validated decisions as weight-trainer rows. Returns rows written.
    pub fn export_fusion_training_csv(
        &self,
        path: &Path,
        since: Option<DateTime<Utc>>,
    ) -> SurveyorResult<usize> {
        let _span = surveyor_observability::calibration_span!("export").entered();
        let rows = self.storage.calibrated_decisions(since)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let written = write_training_csv(&rows, BufWriter::new(File::create(path)?))?;
        info!(path = %path.display(), rows = written, "fusion training data exported");
        Ok(written)
    }
}
