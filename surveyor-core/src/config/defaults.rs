// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "surveyor.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Fusion ---
pub const DEFAULT_SEGMENTATION_WEIGHT: f64 = 0.40;
pub const DEFAULT_EXTERNAL_ASSESSOR_WEIGHT: f64 = 0.35;
pub const DEFAULT_STRUCTURAL_GRAPH_WEIGHT: f64 = 0.25;
pub const DEFAULT_SEGMENTATION_VARIANCE: f64 = 0.01;
pub const DEFAULT_STRUCTURAL_GRAPH_VARIANCE: f64 = 0.02;
pub const DEFAULT_EXTERNAL_ASSESSOR_VARIANCE: f64 = 0.04;
pub const DEFAULT_INTERVAL_SIGMAS: f64 = 2.0;
pub const DEFAULT_LOW_UNCERTAINTY_CV: f64 = 0.2;
pub const DEFAULT_MEDIUM_UNCERTAINTY_CV: f64 = 0.5;

// --- Routing ---
pub const DEFAULT_HIGH_CONFIDENCE_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.70;
pub const DEFAULT_INTERNAL_ROUTING_ENABLED: bool = true;

// --- Retraining ---
pub const DEFAULT_MIN_CORRECTIONS: usize = 100;
pub const DEFAULT_MAX_CORRECTIONS: usize = 1_000;
pub const DEFAULT_RETRAINING_INTERVAL_DAYS: i64 = 7;
pub const DEFAULT_TRAINING_COMMAND: &str = "python3";
pub const DEFAULT_TRAINING_SCRIPT: &str = "scripts/retrain-yolo-continuous.py";
pub const DEFAULT_BASE_MODEL: &str = "runs/detect/building-defect-v2-normalized-cpu/weights/best.pt";
pub const DEFAULT_BASE_DATASET_DIR: &str = "training-data/base";
pub const DEFAULT_WORK_DIR: &str = "training-data/continuous-learning";
pub const DEFAULT_MODELS_DIR: &str = "models";
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_LEASE_TTL_SECS: i64 = 7_200; // 2 hours
pub const DEFAULT_SCHEDULER_POLL_SECS: u64 = 3_600;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
