//! # surveyor-routing
//!
//! Chooses, per request, whether the internal classifier, the external
//! assessor, or both execute, then runs the chosen route and logs the decision.

pub mod agreement;
pub mod confidence;
pub mod engine;
pub mod policy;
pub mod safety;

pub use confidence::{ConfidenceEstimator, CoverageConfidenceEstimator};
pub use engine::{RoutedAssessment, RoutingDecisionEngine};
pub use policy::{decide_route, RouteChoice, RouteInputs, RouteReason};
pub use safety::{check_safety, SafetyTrigger};
