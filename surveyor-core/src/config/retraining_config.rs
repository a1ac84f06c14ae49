use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Continuous-learning retraining configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainingConfig {
    /// Minimum approved, unused corrections before a run is eligible.
    pub min_corrections: usize,
    /// Maximum corrections consumed by a single run.
    pub max_corrections: usize,
    /// Minimum days between completed runs.
    pub retraining_interval_days: i64,
    /// Executable that runs the training script.
    pub training_command: String,
    /// Training script passed as the first argument.
    pub training_script: PathBuf,
    /// Base model weights the run fine-tunes from.
    pub base_model: PathBuf,
    /// Base dataset directory (expects `images/train` and `images/val`).
    pub base_dataset_dir: PathBuf,
    /// Directory where per-job training data is materialized.
    pub work_dir: PathBuf,
    /// Directory the training process writes exported models into.
    pub models_dir: PathBuf,
    /// Kill the training process after this many seconds.
    pub process_timeout_secs: u64,
    /// TTL of the cross-instance retraining lease.
    pub lease_ttl_secs: i64,
    /// Interval between scheduler eligibility checks.
    pub scheduler_poll_secs: u64,
    /// Detection class names, indexed by YOLO class id.
    pub class_names: Vec<String>,
}

impl Default for RetrainingConfig {
    fn default() -> Self {
        Self {
            min_corrections: defaults::DEFAULT_MIN_CORRECTIONS,
            max_corrections: defaults::DEFAULT_MAX_CORRECTIONS,
            retraining_interval_days: defaults::DEFAULT_RETRAINING_INTERVAL_DAYS,
            training_command: defaults::DEFAULT_TRAINING_COMMAND.to_string(),
            training_script: PathBuf::from(defaults::DEFAULT_TRAINING_SCRIPT),
            base_model: PathBuf::from(defaults::DEFAULT_BASE_MODEL),
            base_dataset_dir: PathBuf::from(defaults::DEFAULT_BASE_DATASET_DIR),
            work_dir: PathBuf::from(defaults::DEFAULT_WORK_DIR),
            models_dir: PathBuf::from(defaults::DEFAULT_MODELS_DIR),
            process_timeout_secs: defaults::DEFAULT_PROCESS_TIMEOUT_SECS,
            lease_ttl_secs: defaults::DEFAULT_LEASE_TTL_SECS,
            scheduler_poll_secs: defaults::DEFAULT_SCHEDULER_POLL_SECS,
            class_names: vec![
                "crack".to_string(),
                "spalling".to_string(),
                "water_damage".to_string(),
                "mold".to_string(),
                "corrosion".to_string(),
                "structural_deformation".to_string(),
            ],
        }
    }
}
