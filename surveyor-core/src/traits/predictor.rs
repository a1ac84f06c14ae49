use crate::errors::SurveyorResult;
use crate::models::{AssessmentRequest, DamagePrediction, ModelRegistryEntry};

/// The cheap internal damage classifier.
pub trait IInternalPredictor: Send + Sync {
    /// Predict with the given registry entry, which is the active model at
    /// dispatch time.
    fn predict(
        &self,
        request: &AssessmentRequest,
        model: &ModelRegistryEntry,
    ) -> SurveyorResult<DamagePrediction>;
}

/// The expensive, high-accuracy external assessor.
pub trait IExternalAssessor: Send + Sync {
    fn assess(&self, request: &AssessmentRequest) -> SurveyorResult<DamagePrediction>;
}
