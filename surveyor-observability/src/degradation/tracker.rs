//! Bounded log of degradations: which component failed, how, what fallback
//! served the request, and whether the component has since recovered.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use surveyor_core::models::DegradationEvent;

/// Oldest entries are dropped past this many.
pub const DEFAULT_MAX_TRACKED: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    fn is_active_for(&self, component: &str) -> bool {
        self.recovery_status == RecoveryStatus::Active && self.event.component == component
    }
}

/// Fusion fallbacks, predictor fallbacks and persistence failures, kept for
/// alerting and reporting.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
    max_tracked: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_TRACKED)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(max_tracked: usize) -> Self {
        Self {
            events: Vec::new(),
            max_tracked: max_tracked.max(1),
        }
    }

    /// Record a degradation and emit it as a log event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() >= self.max_tracked {
            let excess = self.events.len() + 1 - self.max_tracked;
            self.events.drain(..excess);
        }
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of `component` as recovered. Returns
    /// how many were closed.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let now = Utc::now();
        let mut closed = 0;
        for tracked in self.events.iter_mut().filter(|t| t.is_active_for(component)) {
            tracked.recovery_status = RecoveryStatus::Recovered;
            tracked.recovered_at = Some(now);
            closed += 1;
        }
        if closed > 0 {
            tracing::info!(component = %component, closed, "component recovered");
        }
        closed
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| t.is_active_for(component))
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Events for `component` within the last `window_secs`.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `component` has been continuously degraded.
    pub fn degraded_duration(&self, component: &str) -> Option<Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| t.is_active_for(component))
            .map(|t| t.event.timestamp)
            .min()?;
        Some(Utc::now() - earliest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(component: &str) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            failure: "boom".to_string(),
            fallback_used: "external".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn oldest_events_are_dropped_past_the_limit() {
        let mut tracker = DegradationTracker::with_capacity_limit(3);
        for component in ["a", "b", "c", "d"] {
            tracker.record(event(component));
        }
        let components: Vec<&str> = tracker
            .events()
            .iter()
            .map(|t| t.event.component.as_str())
            .collect();
        assert_eq!(components, ["b", "c", "d"]);
    }

    #[test]
    fn recovery_closes_every_active_event_of_a_component() {
        let mut tracker = DegradationTracker::new();
        tracker.record(event("fusion"));
        tracker.record(event("fusion"));
        tracker.record(event("decision_log"));

        assert_eq!(tracker.mark_recovered("fusion"), 2);
        assert!(!tracker.is_degraded("fusion"));
        assert!(tracker.is_degraded("decision_log"));
        assert_eq!(tracker.mark_recovered("fusion"), 0);
    }
}
