use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::INTERNAL_MODEL_TYPE;

/// Routing decision configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Internal confidence at or above which only the internal model runs.
    pub high_confidence_threshold: f64,
    /// Internal confidence at or above which both models run.
    pub medium_confidence_threshold: f64,
    /// When false, every request routes to the external assessor.
    pub internal_routing_enabled: bool,
    /// Registry model type read as "the active internal model".
    pub internal_model_type: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: defaults::DEFAULT_HIGH_CONFIDENCE_THRESHOLD,
            medium_confidence_threshold: defaults::DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD,
            internal_routing_enabled: defaults::DEFAULT_INTERNAL_ROUTING_ENABLED,
            internal_model_type: INTERNAL_MODEL_TYPE.to_string(),
        }
    }
}
