//! Storage seams. Implementations block on SQLite, so async callers must
//! go through `tokio::task::spawn_blocking`; calling them directly on a
//! runtime worker panics in the writer's `blocking_lock`.

use chrono::{DateTime, Duration, Utc};

use crate::errors::SurveyorResult;
use crate::models::{
    CalibratedDecision, CalibrationRecord, CorrectionStatus, ModelRegistryEntry, RetrainingJob,
    RouteStats, RoutingDecision, TrainingCorrection,
};

/// Append-only log of routing decisions.
pub trait IDecisionStorage: Send + Sync {
    fn insert_decision(&self, decision: &RoutingDecision) -> SurveyorResult<()>;
    fn get_decision(&self, id: &str) -> SurveyorResult<Option<RoutingDecision>>;
    fn recent_decisions(&self, limit: usize) -> SurveyorResult<Vec<RoutingDecision>>;
}

/// Calibration outcomes and read-only projections over decisions ⋈ outcomes.
pub trait ICalibrationStorage: Send + Sync {
    /// Append an outcome. Fails if the referenced decision does not exist.
    fn insert_outcome(&self, record: &CalibrationRecord) -> SurveyorResult<i64>;
    /// The authoritative (newest) outcome for a decision.
    fn latest_outcome(&self, decision_id: &str) -> SurveyorResult<Option<CalibrationRecord>>;
    /// Every outcome recorded for a decision, oldest first.
    fn outcome_history(&self, decision_id: &str) -> SurveyorResult<Vec<CalibrationRecord>>;
    /// Decisions outer-joined with their latest outcome.
    fn calibrated_decisions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> SurveyorResult<Vec<CalibratedDecision>>;
    /// Per-route counts, accuracy inputs, and average inference time over
    /// the same decisions `calibrated_decisions(since)` returns.
    fn route_stats(&self, since: Option<DateTime<Utc>>) -> SurveyorResult<Vec<RouteStats>>;
}

/// Model registry. Activation is atomic across a model type.
pub trait IModelRegistry: Send + Sync {
    fn register_model(&self, entry: &ModelRegistryEntry) -> SurveyorResult<()>;
    fn get_model(&self, id: &str) -> SurveyorResult<Option<ModelRegistryEntry>>;
    fn active_model(&self, model_type: &str) -> SurveyorResult<Option<ModelRegistryEntry>>;
    fn list_models(&self, model_type: &str) -> SurveyorResult<Vec<ModelRegistryEntry>>;
    /// Make `id` the single active entry of its model type.
    fn activate_model(&self, id: &str) -> SurveyorResult<ModelRegistryEntry>;
}

/// Human corrections feeding the retraining loop.
pub trait ICorrectionStorage: Send + Sync {
    fn submit_correction(&self, correction: &TrainingCorrection) -> SurveyorResult<()>;
    fn get_correction(&self, id: &str) -> SurveyorResult<Option<TrainingCorrection>>;
    fn set_correction_status(&self, id: &str, status: CorrectionStatus) -> SurveyorResult<()>;
    fn count_approved_unused(&self) -> SurveyorResult<usize>;
    /// Oldest approved, unused corrections first.
    fn approved_unused(&self, limit: usize) -> SurveyorResult<Vec<TrainingCorrection>>;
    /// Mark corrections as consumed by `model_version`. Corrections already
    /// marked are skipped; returns the number newly marked.
    fn mark_used(&self, ids: &[String], model_version: &str) -> SurveyorResult<usize>;
}

/// Retraining job records. Terminal jobs are immutable.
pub trait IRetrainingJobStorage: Send + Sync {
    fn create_job(&self, job: &RetrainingJob) -> SurveyorResult<()>;
    fn update_job(&self, job: &RetrainingJob) -> SurveyorResult<()>;
    /// Atomically mark `correction_ids` used by `model.version`, register
    /// `model`, and write `job` (status `completed`). On error none of the
    /// three writes is kept. Returns the registered entry, whose
    /// `sample_count` is the number of corrections newly marked.
    fn complete_job(
        &self,
        job: &RetrainingJob,
        model: &ModelRegistryEntry,
        correction_ids: &[String],
    ) -> SurveyorResult<ModelRegistryEntry>;
    fn get_job(&self, id: &str) -> SurveyorResult<Option<RetrainingJob>>;
    fn last_completed_job(&self) -> SurveyorResult<Option<RetrainingJob>>;
    fn list_jobs(&self, limit: usize) -> SurveyorResult<Vec<RetrainingJob>>;
}

/// Named leases with TTL, shared by every instance using the same database.
pub trait ILeaseStorage: Send + Sync {
    /// Take the lease if free, expired, or already held by `holder`.
    fn try_acquire_lease(&self, name: &str, holder: &str, ttl: Duration) -> SurveyorResult<bool>;
    /// Release the lease if held by `holder`.
    fn release_lease(&self, name: &str, holder: &str) -> SurveyorResult<()>;
    /// Current unexpired holder, if any.
    fn lease_holder(&self, name: &str) -> SurveyorResult<Option<String>>;
}
