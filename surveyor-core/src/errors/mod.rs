mod fusion_error;
mod retraining_error;
mod storage_error;
mod surveyor_error;

pub use fusion_error::FusionError;
pub use retraining_error::RetrainingError;
pub use storage_error::StorageError;
pub use surveyor_error::{SurveyorError, SurveyorResult};
