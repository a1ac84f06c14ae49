//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log the route chosen for a request.
pub fn route_selected(request_id: &str, route: &str, confidence: f64, reasoning: &str) {
    tracing::info!(
        event = "route_selected",
        request_id = %request_id,
        route = %route,
        confidence = confidence,
        reasoning = %reasoning,
        "route selected"
    );
}

/// Log a safety override forcing the external route.
pub fn safety_override(request_id: &str, cause: &str) {
    tracing::warn!(
        event = "safety_override",
        request_id = %request_id,
        cause = %cause,
        "safety override forced external route"
    );
}

/// Log a fusion failure that fell back to the conservative estimate.
pub fn fusion_degraded(reason: &str) {
    tracing::warn!(
        event = "fusion_degraded",
        reason = %reason,
        "fusion failed, conservative estimate used"
    );
}

/// Log a routing decision that could not be persisted.
pub fn decision_persist_failed(decision_id: &str, error: &str) {
    tracing::error!(
        event = "decision_persist_failed",
        decision_id = %decision_id,
        error = %error,
        "routing decision not persisted"
    );
}

/// Log a recorded calibration outcome.
pub fn outcome_recorded(decision_id: &str, was_correct: bool) {
    tracing::info!(
        event = "outcome_recorded",
        decision_id = %decision_id,
        was_correct = was_correct,
        "calibration outcome recorded"
    );
}

/// Log the start of a retraining run.
pub fn retraining_started(job_id: &str, corrections: usize) {
    tracing::info!(
        event = "retraining_started",
        job_id = %job_id,
        corrections = corrections,
        "retraining started"
    );
}

/// Log a completed retraining run.
pub fn retraining_completed(job_id: &str, model_version: &str, duration_secs: f64) {
    tracing::info!(
        event = "retraining_completed",
        job_id = %job_id,
        model_version = %model_version,
        duration_secs = duration_secs,
        "retraining completed"
    );
}

/// Log a failed retraining run.
pub fn retraining_failed(job_id: &str, error: &str) {
    tracing::error!(
        event = "retraining_failed",
        job_id = %job_id,
        error = %error,
        "retraining failed"
    );
}

/// Log a model activation.
pub fn model_activated(model_type: &str, version: &str) {
    tracing::info!(
        event = "model_activated",
        model_type = %model_type,
        version = %version,
        "model activated"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}
