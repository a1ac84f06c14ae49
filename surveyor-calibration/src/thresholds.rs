//! Threshold recommendation from calibrated buckets.

use serde::{Deserialize, Serialize};

use crate::report::ConfidenceBucket;

/// How far below the high-threshold target the medium threshold may sit.
pub const MEDIUM_TARGET_RELAXATION: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRecommendation {
    pub target_accuracy: f64,
    pub min_samples: usize,
    /// None when no bucket has enough validated samples meeting the target.
    pub high_confidence_threshold: Option<f64>,
    pub medium_confidence_threshold: Option<f64>,
    pub current_high: f64,
    pub current_medium: f64,
}

/// Lowest bucket lower bound such that that bucket and every bucket above it
/// meet `target`. Buckets with fewer than `min_samples` validated outcomes
/// neither qualify nor disqualify.
pub fn lowest_qualifying_bound(
    buckets: &[ConfidenceBucket],
    target: f64,
    min_samples: usize,
) -> Option<f64> {
    let mut bound = None;
    for bucket in buckets.iter().rev() {
        if bucket.validated < min_samples.max(1) {
            continue;
        }
        match bucket.accuracy() {
            Some(acc) if acc >= target => bound = Some(bucket.lower),
            _ => break,
        }
    }
    bound
}

pub fn recommend(
    buckets: &[ConfidenceBucket],
    target_accuracy: f64,
    min_samples: usize,
    current_high: f64,
    current_medium: f64,
) -> ThresholdRecommendation {
    let high = lowest_qualifying_bound(buckets, target_accuracy, min_samples);
    let medium = lowest_qualifying_bound(
        buckets,
        (target_accuracy - MEDIUM_TARGET_RELAXATION).max(0.0),
        min_samples,
    )
    .map(|m| match high {
        Some(h) => m.min(h),
        None => m,
    });

    ThresholdRecommendation {
        target_accuracy,
        min_samples,
        high_confidence_threshold: high,
        medium_confidence_threshold: medium,
        current_high,
        current_medium,
    }
}
