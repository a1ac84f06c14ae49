//! # surveyor-observability
//!
//! Structured tracing setup, span macros for the fusion, routing, calibration,
//! and retraining paths, named log events, and degradation tracking with alerting.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{evaluate_alerts, AlertLevel, DegradationAlert, DegradationTracker};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
