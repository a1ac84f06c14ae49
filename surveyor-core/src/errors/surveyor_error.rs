use super::{FusionError, RetrainingError, StorageError};

/// Top-level error type for the Surveyor system.
#[derive(Debug, thiserror::Error)]
pub enum SurveyorError {
    #[error("routing decision not found: {id}")]
    DecisionNotFound { id: String },

    #[error("model not found in registry: {id}")]
    ModelNotFound { id: String },

    #[error("training correction not found: {id}")]
    CorrectionNotFound { id: String },

    #[error("retraining job not found: {id}")]
    JobNotFound { id: String },

    #[error("retraining job {id} is terminal ({status}) and cannot be modified")]
    TerminalJobImmutable { id: String, status: String },

    #[error("{predictor} predictor failed: {reason}")]
    PredictorFailed { predictor: String, reason: String },

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("fusion error: {0}")]
    FusionError(#[from] FusionError),

    #[error("retraining error: {0}")]
    RetrainingError(#[from] RetrainingError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("yaml error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience alias used throughout the workspace.
pub type SurveyorResult<T> = Result<T, SurveyorError>;
