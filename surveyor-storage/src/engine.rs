//! StorageEngine: owns the ConnectionPool and implements every storage trait
//! in `surveyor_core::traits`.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use surveyor_core::config::StorageConfig;
use surveyor_core::errors::SurveyorResult;
use surveyor_core::models::{
    CalibratedDecision, CalibrationRecord, CorrectionStatus, ModelRegistryEntry, RetrainingJob,
    RouteStats, RoutingDecision, TrainingCorrection,
};
use surveyor_core::traits::{
    ICalibrationStorage, ICorrectionStorage, IDecisionStorage, ILeaseStorage, IModelRegistry,
    IRetrainingJobStorage,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{
    aggregation, calibration_ops, correction_ops, decision_ops, job_ops, lease_ops, registry_ops,
};

/// The storage engine. Writes are serialized through the single writer;
/// reads go to the read pool when the database is file-backed.
pub struct StorageEngine {
    pool: ConnectionPool,
    schema_version: u32,
}

impl StorageEngine {
    /// Open a file-backed engine with default pool settings.
    pub fn open(path: &Path) -> SurveyorResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    /// Open a file-backed engine using pool size and busy timeout from `config`.
    /// `config.db_path` is ignored in favor of `path`.
    pub fn open_with_config(path: &Path, config: &StorageConfig) -> SurveyorResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let engine = Self::initialize(pool)?;
        info!(
            path = %path.display(),
            schema_version = engine.schema_version,
            "storage opened"
        );
        Ok(engine)
    }

    /// Open an in-memory engine (for testing). All reads go through the writer.
    pub fn open_in_memory() -> SurveyorResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        Self::initialize(pool)
    }

    fn initialize(pool: ConnectionPool) -> SurveyorResult<Self> {
        let schema_version = pool.writer.with_conn_sync(migrations::run_migrations)?;
        Ok(Self {
            pool,
            schema_version,
        })
    }

    /// Schema version after migrations ran.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Total routing decisions stored.
    pub fn decision_count(&self) -> SurveyorResult<usize> {
        self.with_reader(aggregation::decision_count)
    }

    /// Mean inference time over all decisions.
    pub fn average_inference_time_ms(&self) -> SurveyorResult<f64> {
        self.with_reader(aggregation::average_inference_time_ms)
    }

    fn with_reader<F, T>(&self, f: F) -> SurveyorResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> SurveyorResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }

    fn with_writer<F, T>(&self, f: F) -> SurveyorResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> SurveyorResult<T>,
    {
        self.pool.writer.with_conn_sync(f)
    }
}

impl IDecisionStorage for StorageEngine {
    fn insert_decision(&self, decision: &RoutingDecision) -> SurveyorResult<()> {
        self.with_writer(|conn| decision_ops::insert_decision(conn, decision))?;
        debug!(id = %decision.id, route = %decision.route, "decision stored");
        Ok(())
    }

    fn get_decision(&self, id: &str) -> SurveyorResult<Option<RoutingDecision>> {
        self.with_reader(|conn| decision_ops::get_decision(conn, id))
    }

    fn recent_decisions(&self, limit: usize) -> SurveyorResult<Vec<RoutingDecision>> {
        self.with_reader(|conn| decision_ops::recent_decisions(conn, limit))
    }
}

impl ICalibrationStorage for StorageEngine {
    fn insert_outcome(&self, record: &CalibrationRecord) -> SurveyorResult<i64> {
        self.with_writer(|conn| calibration_ops::insert_outcome(conn, record))
    }

    fn latest_outcome(&self, decision_id: &str) -> SurveyorResult<Option<CalibrationRecord>> {
        self.with_reader(|conn| calibration_ops::latest_outcome(conn, decision_id))
    }

    fn outcome_history(&self, decision_id: &str) -> SurveyorResult<Vec<CalibrationRecord>> {
        self.with_reader(|conn| calibration_ops::outcome_history(conn, decision_id))
    }

    fn calibrated_decisions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> SurveyorResult<Vec<CalibratedDecision>> {
        self.with_reader(|conn| calibration_ops::calibrated_decisions(conn, since))
    }

    fn route_stats(&self, since: Option<DateTime<Utc>>) -> SurveyorResult<Vec<RouteStats>> {
        self.with_reader(|conn| aggregation::route_stats(conn, since))
    }
}

impl IModelRegistry for StorageEngine {
    fn register_model(&self, entry: &ModelRegistryEntry) -> SurveyorResult<()> {
        self.with_writer(|conn| registry_ops::register_model(conn, entry))
    }

    fn get_model(&self, id: &str) -> SurveyorResult<Option<ModelRegistryEntry>> {
        self.with_reader(|conn| registry_ops::get_model(conn, id))
    }

    fn active_model(&self, model_type: &str) -> SurveyorResult<Option<ModelRegistryEntry>> {
        self.with_reader(|conn| registry_ops::active_model(conn, model_type))
    }

    fn list_models(&self, model_type: &str) -> SurveyorResult<Vec<ModelRegistryEntry>> {
        self.with_reader(|conn| registry_ops::list_models(conn, model_type))
    }

    fn activate_model(&self, id: &str) -> SurveyorResult<ModelRegistryEntry> {
        self.with_writer(|conn| registry_ops::activate_model(conn, id))
    }
}

impl ICorrectionStorage for StorageEngine {
    fn submit_correction(&self, correction: &TrainingCorrection) -> SurveyorResult<()> {
        self.with_writer(|conn| correction_ops::submit_correction(conn, correction))
    }

    fn get_correction(&self, id: &str) -> SurveyorResult<Option<TrainingCorrection>> {
        self.with_reader(|conn| correction_ops::get_correction(conn, id))
    }

    fn set_correction_status(&self, id: &str, status: CorrectionStatus) -> SurveyorResult<()> {
        self.with_writer(|conn| correction_ops::set_correction_status(conn, id, status))
    }

    fn count_approved_unused(&self) -> SurveyorResult<usize> {
        self.with_reader(correction_ops::count_approved_unused)
    }

    fn approved_unused(&self, limit: usize) -> SurveyorResult<Vec<TrainingCorrection>> {
        self.with_reader(|conn| correction_ops::approved_unused(conn, limit))
    }

    fn mark_used(&self, ids: &[String], model_version: &str) -> SurveyorResult<usize> {
        self.with_writer(|conn| correction_ops::mark_used(conn, ids, model_version))
    }
}

impl IRetrainingJobStorage for StorageEngine {
    fn create_job(&self, job: &RetrainingJob) -> SurveyorResult<()> {
        self.with_writer(|conn| job_ops::create_job(conn, job))
    }

    fn update_job(&self, job: &RetrainingJob) -> SurveyorResult<()> {
        self.with_writer(|conn| job_ops::update_job(conn, job))
    }

    fn complete_job(
        &self,
        job: &RetrainingJob,
        model: &ModelRegistryEntry,
        correction_ids: &[String],
    ) -> SurveyorResult<ModelRegistryEntry> {
        let entry =
            self.with_writer(|conn| job_ops::complete_job(conn, job, model, correction_ids))?;
        debug!(job_id = %job.id, model_id = %entry.id, "retraining job completed");
        Ok(entry)
    }

    fn get_job(&self, id: &str) -> SurveyorResult<Option<RetrainingJob>> {
        self.with_reader(|conn| job_ops::get_job(conn, id))
    }

    fn last_completed_job(&self) -> SurveyorResult<Option<RetrainingJob>> {
        self.with_reader(job_ops::last_completed_job)
    }

    fn list_jobs(&self, limit: usize) -> SurveyorResult<Vec<RetrainingJob>> {
        self.with_reader(|conn| job_ops::list_jobs(conn, limit))
    }
}

impl ILeaseStorage for StorageEngine {
    fn try_acquire_lease(&self, name: &str, holder: &str, ttl: Duration) -> SurveyorResult<bool> {
        self.with_writer(|conn| lease_ops::try_acquire_lease(conn, name, holder, ttl))
    }

    fn release_lease(&self, name: &str, holder: &str) -> SurveyorResult<()> {
        self.with_writer(|conn| lease_ops::release_lease(conn, name, holder))
    }

    fn lease_holder(&self, name: &str) -> SurveyorResult<Option<String>> {
        self.with_writer(|conn| lease_ops::lease_holder(conn, name))
    }
}
