//! The routing state machine as a pure function of its inputs.

use std::fmt;

use surveyor_core::config::RoutingConfig;
use surveyor_core::models::Route;

use crate::safety::SafetyTrigger;

/// Everything the policy looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInputs {
    pub has_active_model: bool,
    pub sources_available: usize,
    pub safety: Option<SafetyTrigger>,
    pub internal_confidence: f64,
}

/// Reasoning attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteReason {
    InternalRoutingDisabled,
    NoActiveModel,
    NoEvidence,
    SafetyOverride(SafetyTrigger),
    HighConfidence,
    MediumConfidenceHybrid,
    LowConfidence,
}

impl fmt::Display for RouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InternalRoutingDisabled => f.write_str("internal_routing_disabled"),
            Self::NoActiveModel => f.write_str("no_active_model"),
            Self::NoEvidence => f.write_str("no_evidence"),
            Self::SafetyOverride(trigger) => write!(f, "safety_override:{trigger}"),
            Self::HighConfidence => f.write_str("high_confidence"),
            Self::MediumConfidenceHybrid => f.write_str("medium_confidence_hybrid"),
            Self::LowConfidence => f.write_str("low_confidence"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteChoice {
    pub route: Route,
    pub reason: RouteReason,
}

impl RouteChoice {
    fn external(reason: RouteReason) -> Self {
        Self {
            route: Route::External,
            reason,
        }
    }
}

/// Evaluated in order: routing disabled, no active model, no evidence,
/// safety override, then the confidence thresholds.
pub fn decide_route(inputs: &RouteInputs, config: &RoutingConfig) -> RouteChoice {
    if !config.internal_routing_enabled {
        return RouteChoice::external(RouteReason::InternalRoutingDisabled);
    }
    if !inputs.has_active_model {
        return RouteChoice::external(RouteReason::NoActiveModel);
    }
    if inputs.sources_available == 0 {
        return RouteChoice::external(RouteReason::NoEvidence);
    }
    if let Some(trigger) = inputs.safety {
        return RouteChoice::external(RouteReason::SafetyOverride(trigger));
    }

    let confidence = if inputs.internal_confidence.is_finite() {
        inputs.internal_confidence
    } else {
        0.0
    };
    if confidence >= config.high_confidence_threshold {
        RouteChoice {
            route: Route::Internal,
            reason: RouteReason::HighConfidence,
        }
    } else if confidence >= config.medium_confidence_threshold {
        RouteChoice {
            route: Route::Hybrid,
            reason: RouteReason::MediumConfidenceHybrid,
        }
    } else {
        RouteChoice::external(RouteReason::LowConfidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(confidence: f64) -> RouteInputs {
        RouteInputs {
            has_active_model: true,
            sources_available: 3,
            safety: None,
            internal_confidence: confidence,
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let config = RoutingConfig::default();
        assert_eq!(decide_route(&inputs(0.85), &config).route, Route::Internal);
        assert_eq!(decide_route(&inputs(0.70), &config).route, Route::Hybrid);
        assert_eq!(decide_route(&inputs(0.6999), &config).route, Route::External);
    }

    #[test]
    fn no_model_wins_over_confidence() {
        let choice = decide_route(
            &RouteInputs {
                has_active_model: false,
                ..inputs(0.99)
            },
            &RoutingConfig::default(),
        );
        assert_eq!(choice, RouteChoice::external(RouteReason::NoActiveModel));
    }

    #[test]
    fn disabled_routes_everything_external() {
        let config = RoutingConfig {
            internal_routing_enabled: false,
            ..RoutingConfig::default()
        };
        assert_eq!(
            decide_route(&inputs(0.99), &config).reason,
            RouteReason::InternalRoutingDisabled
        );
    }

    #[test]
    fn nan_confidence_is_low() {
        assert_eq!(
            decide_route(&inputs(f64::NAN), &RoutingConfig::default()).reason,
            RouteReason::LowConfidence
        );
    }

    #[test]
    fn reason_tags() {
        assert_eq!(
            RouteReason::SafetyOverride(SafetyTrigger::CommercialProperty).to_string(),
            "safety_override:commercial_property"
        );
        assert_eq!(RouteReason::MediumConfidenceHybrid.to_string(), "medium_confidence_hybrid");
    }
}
