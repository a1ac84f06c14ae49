//! # surveyor-core
//!
//! Foundation crate for the Surveyor damage-assessment router.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SurveyorConfig;
pub use errors::{SurveyorError, SurveyorResult};
pub use models::{
    AssessmentRequest, DamagePrediction, EvidenceSource, EvidenceWeights, FusionResult, Route,
    RoutingDecision, Severity, UncertaintyLevel, Urgency,
};
