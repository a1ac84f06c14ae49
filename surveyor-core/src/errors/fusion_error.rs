/// Fusion errors. Never surfaced by `FusionEngine::fuse`, which converts
/// them into the conservative fallback estimate.
#[derive(Debug, thiserror::Error)]
pub enum FusionError {
    #[error("non-finite {field} from source {source_id}")]
    NonFiniteInput { source_id: String, field: String },

    #[error("{field} out of range for source {source_id}: {value}")]
    OutOfRange {
        source_id: String,
        field: String,
        value: f64,
    },

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("non-finite fusion result: mean {mean}, variance {variance}")]
    NonFiniteResult { mean: f64, variance: f64 },
}
