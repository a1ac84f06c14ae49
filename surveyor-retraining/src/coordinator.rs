//! RetrainingCoordinator: eligibility, exclusion, and one training run
//! from corrections to a registered (inactive) model version.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use surveyor_core::config::RetrainingConfig;
use surveyor_core::constants::{INTERNAL_MODEL_TYPE, RETRAINING_LEASE_NAME};
use surveyor_core::errors::{RetrainingError, SurveyorError, SurveyorResult};
use surveyor_core::models::{ModelRegistryEntry, RetrainingJob, RetrainingJobStatus};
use surveyor_core::traits::{
    ICorrectionStorage, ILeaseStorage, IModelRegistry, IRetrainingJobStorage, ITrainingRunner,
    TrainingRequest,
};
use surveyor_observability::tracing_setup::events;

use crate::dataset::{self, MaterializedDataset};
use crate::guard::RunFlag;
use crate::{artifacts, runner::ProcessTrainingRunner};

/// A completed run: the terminal job row and the model it registered.
#[derive(Debug, Clone)]
pub struct RetrainingOutcome {
    pub job: RetrainingJob,
    pub model: ModelRegistryEntry,
}

/// Point-in-time view of the retraining loop.
#[derive(Debug, Clone, Serialize)]
pub struct RetrainingStatus {
    pub is_running: bool,
    pub approved_unused: usize,
    pub min_corrections: usize,
    pub last_completed: Option<RetrainingJob>,
    /// None when no run has completed yet.
    pub next_eligible_at: Option<DateTime<Utc>>,
}

pub struct RetrainingCoordinator {
    config: RetrainingConfig,
    model_type: String,
    instance_id: String,
    corrections: Arc<dyn ICorrectionStorage>,
    jobs: Arc<dyn IRetrainingJobStorage>,
    leases: Arc<dyn ILeaseStorage>,
    registry: Arc<dyn IModelRegistry>,
    runner: Arc<dyn ITrainingRunner>,
    flag: RunFlag,
}

impl RetrainingCoordinator {
    /// Coordinator over a single storage backend implementing every
    /// retraining store.
    pub fn new<S>(
        config: RetrainingConfig,
        storage: Arc<S>,
        runner: Arc<dyn ITrainingRunner>,
    ) -> Self
    where
        S: ICorrectionStorage + IRetrainingJobStorage + ILeaseStorage + IModelRegistry + 'static,
    {
        Self {
            config,
            model_type: INTERNAL_MODEL_TYPE.to_string(),
            instance_id: uuid::Uuid::new_v4().to_string(),
            corrections: storage.clone(),
            jobs: storage.clone(),
            leases: storage.clone(),
            registry: storage,
            runner,
            flag: RunFlag::new(),
        }
    }

    /// Coordinator that shells out to the configured training script.
    pub fn with_process_runner<S>(config: RetrainingConfig, storage: Arc<S>) -> Self
    where
        S: ICorrectionStorage + IRetrainingJobStorage + ILeaseStorage + IModelRegistry + 'static,
    {
        let runner = Arc::new(ProcessTrainingRunner::new(&config));
        Self::new(config, storage, runner)
    }

    /// Register trained models under `model_type` instead of the internal
    /// damage classifier.
    pub fn with_model_type(mut self, model_type: &str) -> Self {
        self.model_type = model_type.to_string();
        self
    }

    pub fn config(&self) -> &RetrainingConfig {
        &self.config
    }

    /// Lease holder id of this instance.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn is_running(&self) -> bool {
        self.flag.is_running()
    }

    /// True when enough approved corrections are waiting, no run is in
    /// progress here, and the interval since the last completed run elapsed.
    pub fn should_retrain(&self) -> SurveyorResult<bool> {
        Ok(self.ineligibility(Utc::now())?.is_none())
    }

    /// Earliest time the interval rule allows another run.
    pub fn next_eligible_at(&self) -> SurveyorResult<Option<DateTime<Utc>>> {
        Ok(self
            .jobs
            .last_completed_job()?
            .map(|job| self.eligible_after(&job)))
    }

    pub fn status(&self) -> SurveyorResult<RetrainingStatus> {
        let last_completed = self.jobs.last_completed_job()?;
        let next_eligible_at = last_completed.as_ref().map(|job| self.eligible_after(job));
        Ok(RetrainingStatus {
            is_running: self.flag.is_running(),
            approved_unused: self.corrections.count_approved_unused()?,
            min_corrections: self.config.min_corrections,
            last_completed,
            next_eligible_at,
        })
    }

    /// Run only if eligible; otherwise `NotEligible` with the reason.
    pub fn trigger_if_eligible(&self) -> SurveyorResult<RetrainingOutcome> {
        if let Some(reason) = self.ineligibility(Utc::now())? {
            return Err(RetrainingError::NotEligible { reason }.into());
        }
        self.trigger_retraining()
    }

    /// Run one retraining job to completion. Blocks for the length of the
    /// training process. Rejected immediately when a run is already in
    /// progress here or another instance holds the lease.
    ///
    /// Any failure after the job row exists marks it `failed` with the
    /// error before the error is returned.
    pub fn trigger_retraining(&self) -> SurveyorResult<RetrainingOutcome> {
        let _guard = self.flag.try_acquire()?;
        let _lease = self.acquire_lease()?;

        let mut job = RetrainingJob::pending();
        self.jobs.create_job(&job)?;

        let _span = surveyor_observability::retraining_span!(job.id).entered();
        let started = Instant::now();

        match self.execute(&mut job) {
            Ok(model) => {
                events::retraining_completed(
                    &job.id,
                    &model.version,
                    started.elapsed().as_secs_f64(),
                );
                Ok(RetrainingOutcome { job, model })
            }
            Err(e) => {
                self.fail_job(&mut job, &e);
                events::retraining_failed(&job.id, &e.to_string());
                Err(e)
            }
        }
    }

    /// Run `trigger_retraining` on tokio's blocking pool. Must be called
    /// from within a tokio runtime.
    pub fn spawn_retraining(
        self: &Arc<Self>,
    ) -> tokio::task::JoinHandle<SurveyorResult<RetrainingOutcome>> {
        let coordinator = Arc::clone(self);
        tokio::task::spawn_blocking(move || coordinator.trigger_retraining())
    }

    /// Make `model_id` the active model of its type. Administrative; never
    /// done automatically when a job completes.
    pub fn activate_model(&self, model_id: &str) -> SurveyorResult<ModelRegistryEntry> {
        let entry = self.registry.activate_model(model_id)?;
        events::model_activated(&entry.model_type, &entry.version);
        Ok(entry)
    }

    fn eligible_after(&self, completed: &RetrainingJob) -> DateTime<Utc> {
        completed.completed_at.unwrap_or(completed.created_at)
            + Duration::days(self.config.retraining_interval_days)
    }

    fn ineligibility(&self, now: DateTime<Utc>) -> SurveyorResult<Option<String>> {
        if self.flag.is_running() {
            return Ok(Some("retraining already in progress".to_string()));
        }
        let available = self.corrections.count_approved_unused()?;
        if available < self.config.min_corrections {
            return Ok(Some(format!(
                "{available} approved corrections, need {}",
                self.config.min_corrections
            )));
        }
        if let Some(next) = self.next_eligible_at()? {
            if now < next {
                return Ok(Some(format!("next run eligible at {}", next.to_rfc3339())));
            }
        }
        Ok(None)
    }

    fn acquire_lease(&self) -> SurveyorResult<LeaseGuard> {
        let ttl = Duration::seconds(self.config.lease_ttl_secs);
        if !self
            .leases
            .try_acquire_lease(RETRAINING_LEASE_NAME, &self.instance_id, ttl)?
        {
            let holder = self
                .leases
                .lease_holder(RETRAINING_LEASE_NAME)?
                .unwrap_or_else(|| "unknown".to_string());
            return Err(RetrainingError::LeaseHeld { holder }.into());
        }
        debug!(holder = %self.instance_id, "retraining lease acquired");
        Ok(LeaseGuard {
            leases: Arc::clone(&self.leases),
            holder: self.instance_id.clone(),
        })
    }

    fn execute(&self, job: &mut RetrainingJob) -> SurveyorResult<ModelRegistryEntry> {
        let corrections = self.corrections.approved_unused(self.config.max_corrections)?;
        if corrections.is_empty() {
            return Err(RetrainingError::NoCorrections.into());
        }

        job.corrections_count = corrections.len();
        job.status = RetrainingJobStatus::Running;
        job.started_at = Some(Utc::now());
        self.jobs.update_job(job)?;
        events::retraining_started(&job.id, corrections.len());

        let dataset = dataset::materialize(&self.config, &job.id, &corrections)?;
        let output = self.runner.run(&TrainingRequest {
            job_id: job.id.clone(),
            dataset_dir: dataset.dir.clone(),
            data_yaml: dataset.data_yaml.clone(),
            models_dir: self.config.models_dir.clone(),
        })?;

        let version = artifacts::parse_model_version(&output.stdout, Utc::now());
        let onnx = artifacts::newest_onnx(&self.config.models_dir)?;
        let metrics = artifacts::load_metrics(&self.config.models_dir, &version);

        let mut model = ModelRegistryEntry::new(&self.model_type, &version);
        model.accuracy = metrics.as_ref().and_then(artifacts::map50);
        model.sample_count = dataset.correction_ids.len() as u64;
        model.artifact_path = Some(onnx.display().to_string());

        let mut completed = job.clone();
        completed.status = RetrainingJobStatus::Completed;
        completed.model_version = Some(version.clone());
        completed.onnx_path = model.artifact_path.clone();
        completed.metrics = Some(job_metrics(metrics, &dataset, &model));
        completed.completed_at = Some(Utc::now());

        let model = self
            .jobs
            .complete_job(&completed, &model, &dataset.correction_ids)?;
        if model.sample_count as usize != dataset.correction_ids.len() {
            warn!(
                expected = dataset.correction_ids.len(),
                marked = model.sample_count,
                "some corrections were already consumed"
            );
        }
        info!(model_id = %model.id, version = %version, "model registered (inactive)");

        *job = completed;
        Ok(model)
    }

    fn fail_job(&self, job: &mut RetrainingJob, error: &SurveyorError) {
        job.status = RetrainingJobStatus::Failed;
        job.error = Some(error.to_string());
        job.completed_at = Some(Utc::now());
        if let Err(e) = self.jobs.update_job(job) {
            warn!(job_id = %job.id, error = %e, "failed to persist failed job");
        }
    }
}

/// Training metrics plus the dataset fingerprint and registered model id.
fn job_metrics(
    metrics: Option<serde_json::Value>,
    dataset: &MaterializedDataset,
    model: &ModelRegistryEntry,
) -> serde_json::Value {
    let mut out = match metrics {
        Some(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    out.insert(
        "dataset_fingerprint".to_string(),
        serde_json::Value::String(dataset.fingerprint.clone()),
    );
    out.insert("label_count".to_string(), dataset.label_count.into());
    out.insert(
        "model_id".to_string(),
        serde_json::Value::String(model.id.clone()),
    );
    serde_json::Value::Object(out)
}

/// Releases the cross-instance lease when dropped.
struct LeaseGuard {
    leases: Arc<dyn ILeaseStorage>,
    holder: String,
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        match self.leases.release_lease(RETRAINING_LEASE_NAME, &self.holder) {
            Ok(()) => debug!(holder = %self.holder, "retraining lease released"),
            Err(e) => warn!(holder = %self.holder, error = %e, "failed to release retraining lease"),
        }
    }
}
