use std::path::PathBuf;

use crate::errors::SurveyorResult;

/// Everything an external training run needs to locate its inputs and outputs.
#[derive(Debug, Clone)]
pub struct TrainingRequest {
    pub job_id: String,
    /// Directory holding the materialized training data.
    pub dataset_dir: PathBuf,
    /// YOLO `data.yaml` describing the merged dataset.
    pub data_yaml: PathBuf,
    /// Directory the run exports models into.
    pub models_dir: PathBuf,
}

/// Captured output of a finished training process.
#[derive(Debug, Clone, Default)]
pub struct TrainingOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a training process to completion. Blocking; long-running.
pub trait ITrainingRunner: Send + Sync {
    fn run(&self, request: &TrainingRequest) -> SurveyorResult<TrainingOutput>;
}
