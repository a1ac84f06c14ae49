//! EvidenceNormalizer: total over the fixed source set. Missing or malformed
//! input for a source becomes the neutral item `(0.5, 0.0)`.

mod external;
mod segmentation;
mod structural;

use surveyor_core::models::{EvidenceItem, EvidenceSource, NormalizedEvidence, RawEvidence};

pub use external::normalize_external;
pub use segmentation::normalize_segmentation;
pub use structural::normalize_structural;

/// Stateless normalizer. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceNormalizer;

impl EvidenceNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &RawEvidence) -> NormalizedEvidence {
        let segmentation = raw
            .segmentation
            .as_ref()
            .and_then(normalize_segmentation)
            .unwrap_or_else(|| EvidenceItem::neutral(EvidenceSource::Segmentation));
        let external = raw
            .external_assessor
            .as_ref()
            .and_then(normalize_external)
            .unwrap_or_else(|| EvidenceItem::neutral(EvidenceSource::ExternalAssessor));
        let structural = raw
            .structural_graph
            .as_ref()
            .and_then(normalize_structural)
            .unwrap_or_else(|| EvidenceItem::neutral(EvidenceSource::StructuralGraph));

        NormalizedEvidence::from_items([segmentation, external, structural])
    }

    /// Normalize an untyped JSON payload. Sources that fail to decode are neutral.
    pub fn normalize_json(&self, value: &serde_json::Value) -> NormalizedEvidence {
        self.normalize(&RawEvidence::from_json_lenient(value))
    }
}

/// Both values finite and within [0, 1].
pub(crate) fn in_unit_range(probability: f64, confidence: f64) -> bool {
    [probability, confidence]
        .iter()
        .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
}
