/// Retraining coordinator errors. All of these are surfaced to the caller;
/// none are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RetrainingError {
    #[error("retraining already in progress")]
    AlreadyInProgress,

    #[error("retraining lease held by another instance: {holder}")]
    LeaseHeld { holder: String },

    #[error("no approved corrections available for retraining")]
    NoCorrections,

    #[error("retraining not eligible: {reason}")]
    NotEligible { reason: String },

    #[error("failed to spawn training process {command}: {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("training process failed with exit code {exit_code:?}: {stderr}")]
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("training process exceeded timeout of {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("none of the {count} selected corrections has a readable image")]
    NoTrainableImages { count: usize },

    #[error("no model artifact found in {dir}")]
    ArtifactMissing { dir: String },
}
