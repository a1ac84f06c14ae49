/// Surveyor system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of evidence sources the fusion engine is defined over.
pub const EVIDENCE_SOURCE_COUNT: usize = 3;

/// Neutral probability assigned to a missing or malformed evidence source.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Confidence assigned to a missing or malformed evidence source.
pub const NEUTRAL_CONFIDENCE: f64 = 0.0;

/// Length of the structural-graph feature vector.
pub const STRUCTURAL_FEATURE_DIM: usize = 12;

/// Slice of the structural-graph feature vector that encodes damage
/// (crack density, spalling, moisture, deformation).
pub const STRUCTURAL_DAMAGE_SLICE: std::ops::Range<usize> = 0..4;

/// Number of equal-width confidence buckets used by calibration reports.
pub const CALIBRATION_BUCKETS: usize = 10;

/// Lease name guarding retraining across coordinator instances.
pub const RETRAINING_LEASE_NAME: &str = "retraining";

/// Model type used for the internal damage classifier in the registry.
pub const INTERNAL_MODEL_TYPE: &str = "internal_damage_classifier";
