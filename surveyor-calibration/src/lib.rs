//! # surveyor-calibration
//!
//! Closes the loop between routing decisions and ground truth: records
//! outcomes, reports accuracy by confidence and route, proposes thresholds,
//! and exports training rows for the offline fusion-weight trainer.

pub mod engine;
pub mod export;
pub mod report;
pub mod thresholds;

pub use engine::CalibrationEngine;
pub use report::{CalibrationReport, ConfidenceBucket};
pub use thresholds::ThresholdRecommendation;
