//! Safety overrides hold regardless of confidence.

use proptest::prelude::*;
use surveyor_core::config::RoutingConfig;
use surveyor_core::models::Route;
use surveyor_routing::{decide_route, RouteInputs, RouteReason, SafetyTrigger};

fn arb_trigger() -> impl Strategy<Value = SafetyTrigger> {
    prop_oneof![
        Just(SafetyTrigger::ImmediateUrgency),
        Just(SafetyTrigger::CommercialProperty),
        Just(SafetyTrigger::CriticalHazard),
    ]
}

proptest! {
    #[test]
    fn safety_always_external(
        trigger in arb_trigger(),
        confidence in 0.0f64..=1.0,
        sources in 1usize..=3,
    ) {
        let choice = decide_route(
            &RouteInputs {
                has_active_model: true,
                sources_available: sources,
                safety: Some(trigger),
                internal_confidence: confidence,
            },
            &RoutingConfig::default(),
        );
        prop_assert_eq!(choice.route, Route::External);
        prop_assert_eq!(choice.reason, RouteReason::SafetyOverride(trigger));
    }

    #[test]
    fn route_is_monotone_in_confidence(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let rank = |c: f64| match decide_route(
            &RouteInputs {
                has_active_model: true,
                sources_available: 3,
                safety: None,
                internal_confidence: c,
            },
            &RoutingConfig::default(),
        )
        .route
        {
            Route::External => 0,
            Route::Hybrid => 1,
            Route::Internal => 2,
        };
        prop_assert!(rank(lo) <= rank(hi));
    }
}
