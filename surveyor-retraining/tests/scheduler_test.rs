//! Scheduler ticks and shutdown. Storage blocks, so the tests touch it only
//! outside `block_on`.

use std::fs;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use surveyor_core::config::RetrainingConfig;
use surveyor_core::errors::SurveyorResult;
use surveyor_core::models::{CorrectionStatus, RetrainingJobStatus, TrainingCorrection};
use surveyor_core::traits::{
    ICorrectionStorage, IRetrainingJobStorage, ITrainingRunner, TrainingOutput, TrainingRequest,
};
use surveyor_retraining::{RetrainingCoordinator, RetrainingScheduler};
use surveyor_storage::StorageEngine;

struct StaticRunner;

impl ITrainingRunner for StaticRunner {
    fn run(&self, request: &TrainingRequest) -> SurveyorResult<TrainingOutput> {
        fs::create_dir_all(&request.models_dir)?;
        fs::write(request.models_dir.join("scheduled.onnx"), b"onnx")?;
        Ok(TrainingOutput {
            stdout: "Model version: scheduled-v1\n".to_string(),
            stderr: String::new(),
        })
    }
}

fn coordinator(
    root: &std::path::Path,
    storage: Arc<StorageEngine>,
) -> Arc<RetrainingCoordinator> {
    let config = RetrainingConfig {
        min_corrections: 2,
        work_dir: root.join("work"),
        models_dir: root.join("models"),
        scheduler_poll_secs: 3600,
        ..Default::default()
    };
    Arc::new(RetrainingCoordinator::new(config, storage, Arc::new(StaticRunner)))
}

fn sample_image() -> String {
    static UPLOADS: OnceLock<tempfile::TempDir> = OnceLock::new();
    let dir = UPLOADS.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.jpg"), b"jpeg").unwrap();
        dir
    });
    dir.path().join("sample.jpg").display().to_string()
}

fn approve(storage: &StorageEngine, n: usize) {
    let image = sample_image();
    for _ in 0..n {
        let c = TrainingCorrection::new(&image, vec![]);
        storage.submit_correction(&c).unwrap();
        storage
            .set_correction_status(&c.id, CorrectionStatus::Approved)
            .unwrap();
    }
}

#[test]
fn tick_skips_when_not_eligible() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    approve(&storage, 1);
    let scheduler = RetrainingScheduler::from_config(coordinator(tmp.path(), storage.clone()));

    let rt = tokio::runtime::Runtime::new().unwrap();
    assert!(rt.block_on(scheduler.tick()).is_none());
    assert!(storage.list_jobs(10).unwrap().is_empty());
}

#[test]
fn tick_runs_when_eligible_then_waits_for_interval() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    approve(&storage, 2);
    let scheduler = RetrainingScheduler::from_config(coordinator(tmp.path(), storage.clone()));

    let rt = tokio::runtime::Runtime::new().unwrap();
    let outcome = rt.block_on(scheduler.tick()).unwrap();
    assert_eq!(outcome.model.version, "scheduled-v1");
    assert_eq!(outcome.job.status, RetrainingJobStatus::Completed);

    approve(&storage, 2);
    assert!(rt.block_on(scheduler.tick()).is_none());
    assert_eq!(storage.list_jobs(10).unwrap().len(), 1);
}

#[test]
fn spawned_scheduler_stops_on_shutdown() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    approve(&storage, 2);
    let scheduler = RetrainingScheduler::new(
        coordinator(tmp.path(), storage.clone()),
        Duration::from_secs(3600),
    );

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let handle = scheduler.spawn();
        // The first tick fires immediately and runs the eligible job.
        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("scheduler did not stop");
    });

    let jobs = storage.list_jobs(10).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, RetrainingJobStatus::Completed);
}
