//! Alert thresholds: >3 degradations in 1 hour → warning, same component >24h → critical.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

const WARNING_WINDOW_SECS: i64 = 3600;
const WARNING_COUNT: usize = 3;
const CRITICAL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// One alert at most per component, critical taking precedence.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen = HashSet::new();

    for tracked in tracker.events() {
        let component = &tracked.event.component;
        if !seen.insert(component.clone()) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(component) {
            if duration > chrono::Duration::hours(CRITICAL_HOURS) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    component: component.clone(),
                    message: format!("{component} has been degraded for over {CRITICAL_HOURS} hours"),
                });
                continue;
            }
        }

        let recent = tracker.count_recent(component, WARNING_WINDOW_SECS);
        if recent > WARNING_COUNT {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                component: component.clone(),
                message: format!("{component} has {recent} degradation events in the last hour"),
            });
        }
    }

    alerts
}
