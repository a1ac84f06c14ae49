//! Read-only projections over decisions ⋈ latest outcome.

use serde::{Deserialize, Serialize};

use surveyor_core::constants::CALIBRATION_BUCKETS;
use surveyor_core::models::{CalibratedDecision, RouteStats};

/// Decisions whose internal confidence fell in `[lower, upper)`; the top
/// bucket also includes 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBucket {
    pub lower: f64,
    pub upper: f64,
    pub decisions: usize,
    pub validated: usize,
    pub correct: usize,
}

impl ConfidenceBucket {
    pub fn accuracy(&self) -> Option<f64> {
        (self.validated > 0).then(|| self.correct as f64 / self.validated as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub total_decisions: usize,
    pub validated: usize,
    /// Decisions with no outcome recorded yet.
    pub unvalidated: usize,
    pub overall_accuracy: Option<f64>,
    pub avg_inference_time_ms: f64,
    pub buckets: Vec<ConfidenceBucket>,
    pub routes: Vec<RouteStats>,
}

/// Bucket index for a confidence in [0, 1].
pub fn bucket_index(confidence: f64) -> usize {
    if !confidence.is_finite() || confidence <= 0.0 {
        return 0;
    }
    ((confidence * CALIBRATION_BUCKETS as f64) as usize).min(CALIBRATION_BUCKETS - 1)
}

pub fn empty_buckets() -> Vec<ConfidenceBucket> {
    (0..CALIBRATION_BUCKETS)
        .map(|i| ConfidenceBucket {
            lower: i as f64 / CALIBRATION_BUCKETS as f64,
            upper: (i + 1) as f64 / CALIBRATION_BUCKETS as f64,
            decisions: 0,
            validated: 0,
            correct: 0,
        })
        .collect()
}

/// Build a report from joined rows and per-route aggregates.
pub fn build_report(rows: &[CalibratedDecision], routes: Vec<RouteStats>) -> CalibrationReport {
    let mut buckets = empty_buckets();
    let mut validated = 0;
    let mut correct = 0;
    let mut total_ms: u64 = 0;

    for row in rows {
        let bucket = &mut buckets[bucket_index(row.confidence)];
        bucket.decisions += 1;
        total_ms = total_ms.saturating_add(row.inference_time_ms);
        if let Some(ok) = row.was_correct {
            bucket.validated += 1;
            validated += 1;
            if ok {
                bucket.correct += 1;
                correct += 1;
            }
        }
    }

    let total = rows.len();
    CalibrationReport {
        total_decisions: total,
        validated,
        unvalidated: total - validated,
        overall_accuracy: (validated > 0).then(|| correct as f64 / validated as f64),
        avg_inference_time_ms: if total > 0 {
            total_ms as f64 / total as f64
        } else {
            0.0
        },
        buckets,
        routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_edges() {
        assert_eq!(bucket_index(0.0), 0);
        assert_eq!(bucket_index(0.099), 0);
        assert_eq!(bucket_index(0.1), 1);
        assert_eq!(bucket_index(0.85), 8);
        assert_eq!(bucket_index(1.0), 9);
        assert_eq!(bucket_index(f64::NAN), 0);
    }

    #[test]
    fn empty_report() {
        let report = build_report(&[], vec![]);
        assert_eq!(report.total_decisions, 0);
        assert_eq!(report.overall_accuracy, None);
        assert_eq!(report.buckets.len(), CALIBRATION_BUCKETS);
        assert_eq!(report.avg_inference_time_ms, 0.0);
    }
}
