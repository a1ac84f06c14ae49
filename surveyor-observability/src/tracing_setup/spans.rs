//! Span definitions per operation: fusion, routing, calibration, retraining.

/// Create a fusion span.
#[macro_export]
macro_rules! fusion_span {
    ($sources_available:expr) => {
        tracing::info_span!("surveyor.fusion", sources_available = $sources_available)
    };
}

/// Create a routing span.
#[macro_export]
macro_rules! routing_span {
    ($request_id:expr) => {
        tracing::info_span!("surveyor.routing", request_id = %$request_id)
    };
}

/// Create a calibration span.
#[macro_export]
macro_rules! calibration_span {
    ($operation:expr) => {
        tracing::info_span!("surveyor.calibration", operation = %$operation)
    };
}

/// Create a retraining span.
#[macro_export]
macro_rules! retraining_span {
    ($job_id:expr) => {
        tracing::info_span!("surveyor.retraining", job_id = %$job_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const FUSION: &str = "surveyor.fusion";
    pub const ROUTING: &str = "surveyor.routing";
    pub const CALIBRATION: &str = "surveyor.calibration";
    pub const RETRAINING: &str = "surveyor.retraining";
}
