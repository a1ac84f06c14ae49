mod assessment;
mod calibration;
mod correction;
mod degradation_event;
mod evidence;
mod fusion_result;
mod model_registry;
mod retraining_job;
mod routing_decision;

pub use assessment::{
    AssessmentRequest, DamagePrediction, PropertyType, SafetyContext, Severity, Urgency,
};
pub use calibration::{CalibratedDecision, CalibrationRecord, OutcomeReport, RouteStats};
pub use correction::{CorrectionStatus, TrainingCorrection, YoloBox};
pub use degradation_event::DegradationEvent;
pub use evidence::{
    DamageTypeDetection, EvidenceItem, EvidenceSource, EvidenceWeights,
    ExternalAssessorEvidence, NormalizedEvidence, RawEvidence, SegmentationEvidence,
    StructuralGraphEvidence,
};
pub use fusion_result::{FusionResult, UncertaintyLevel};
pub use model_registry::ModelRegistryEntry;
pub use retraining_job::{RetrainingJob, RetrainingJobStatus};
pub use routing_decision::{Route, RoutingDecision};
