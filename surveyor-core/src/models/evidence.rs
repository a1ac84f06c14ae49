use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Severity;
use crate::constants::{NEUTRAL_CONFIDENCE, NEUTRAL_PROBABILITY};

/// One of the fixed, independent evidence channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// Instance segmentation over the submitted images.
    Segmentation,
    /// External vision-language assessor.
    ExternalAssessor,
    /// Structural scene-graph features.
    StructuralGraph,
}

impl EvidenceSource {
    /// All sources in canonical order.
    pub const ALL: [EvidenceSource; 3] = [
        EvidenceSource::Segmentation,
        EvidenceSource::ExternalAssessor,
        EvidenceSource::StructuralGraph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Segmentation => "segmentation",
            Self::ExternalAssessor => "external_assessor",
            Self::StructuralGraph => "structural_graph",
        }
    }

    /// Position in [`EvidenceSource::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Segmentation => 0,
            Self::ExternalAssessor => 1,
            Self::StructuralGraph => 2,
        }
    }
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized `(probability, confidence)` pair for one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub source: EvidenceSource,
    /// Probability of damage in [0, 1].
    pub probability: f64,
    /// How much the source trusts its own judgment, in [0, 1].
    pub confidence: f64,
    /// False when the source was absent or malformed.
    pub available: bool,
}

impl EvidenceItem {
    /// Maximal ignorance: probability 0.5, zero confidence, not available.
    pub fn neutral(source: EvidenceSource) -> Self {
        Self {
            source,
            probability: NEUTRAL_PROBABILITY,
            confidence: NEUTRAL_CONFIDENCE,
            available: false,
        }
    }

    pub fn observed(source: EvidenceSource, probability: f64, confidence: f64) -> Self {
        Self {
            source,
            probability,
            confidence,
            available: true,
        }
    }
}

/// Normalized evidence covering every source, in canonical order.
/// Absent sources hold the neutral item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvidence {
    items: [EvidenceItem; 3],
}

impl NormalizedEvidence {
    /// Evidence with every source neutral.
    pub fn empty() -> Self {
        Self {
            items: EvidenceSource::ALL.map(EvidenceItem::neutral),
        }
    }

    /// Build from an arbitrary subset of items; later items for the same
    /// source replace earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = EvidenceItem>) -> Self {
        let mut evidence = Self::empty();
        for item in items {
            evidence.set(item);
        }
        evidence
    }

    pub fn set(&mut self, item: EvidenceItem) {
        self.items[item.source.index()] = item;
    }

    pub fn get(&self, source: EvidenceSource) -> &EvidenceItem {
        &self.items[source.index()]
    }

    pub fn items(&self) -> &[EvidenceItem; 3] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvidenceItem> {
        self.items.iter()
    }

    pub fn available_count(&self) -> usize {
        self.items.iter().filter(|i| i.available).count()
    }

    pub fn is_empty(&self) -> bool {
        self.available_count() == 0
    }
}

impl Default for NormalizedEvidence {
    fn default() -> Self {
        Self::empty()
    }
}

/// Base weight per evidence source. The aliases match the keys written by
/// the offline weight trainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidenceWeights {
    #[serde(alias = "sam3")]
    pub segmentation: f64,
    #[serde(alias = "gpt4")]
    pub external_assessor: f64,
    #[serde(alias = "sceneGraph")]
    pub structural_graph: f64,
}

impl EvidenceWeights {
    pub fn new(segmentation: f64, external_assessor: f64, structural_graph: f64) -> Self {
        Self {
            segmentation,
            external_assessor,
            structural_graph,
        }
    }

    pub fn equal() -> Self {
        let w = 1.0 / 3.0;
        Self::new(w, w, w)
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn get(&self, source: EvidenceSource) -> f64 {
        match source {
            EvidenceSource::Segmentation => self.segmentation,
            EvidenceSource::ExternalAssessor => self.external_assessor,
            EvidenceSource::StructuralGraph => self.structural_graph,
        }
    }

    pub fn set(&mut self, source: EvidenceSource, weight: f64) {
        match source {
            EvidenceSource::Segmentation => self.segmentation = weight,
            EvidenceSource::ExternalAssessor => self.external_assessor = weight,
            EvidenceSource::StructuralGraph => self.structural_graph = weight,
        }
    }

    pub fn sum(&self) -> f64 {
        self.segmentation + self.external_assessor + self.structural_graph
    }

    pub fn is_all_zero(&self) -> bool {
        EvidenceSource::ALL.iter().all(|s| self.get(*s) == 0.0)
    }
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        Self::equal()
    }
}

/// Per-class detection summary reported by the segmentation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageTypeDetection {
    pub confidence: f64,
    pub instance_count: u32,
}

/// Raw segmentation evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationEvidence {
    pub damage_types: BTreeMap<String, DamageTypeDetection>,
    pub overall_confidence: f64,
}

/// Raw external-assessor evidence. `confidence` is on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalAssessorEvidence {
    pub severity: Severity,
    pub confidence: f64,
    pub damage_type: String,
    #[serde(default)]
    pub has_critical_hazards: bool,
}

/// Raw structural-graph evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralGraphEvidence {
    pub features: Vec<f64>,
    pub avg_node_confidence: f64,
}

/// Every raw evidence blob a request may carry. Each source is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvidence {
    #[serde(default)]
    pub segmentation: Option<SegmentationEvidence>,
    #[serde(default)]
    pub external_assessor: Option<ExternalAssessorEvidence>,
    #[serde(default)]
    pub structural_graph: Option<StructuralGraphEvidence>,
}

impl RawEvidence {
    /// Lenient parse: each source is decoded independently and a malformed
    /// blob is dropped instead of failing the whole request.
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        fn field<T: serde::de::DeserializeOwned>(value: &serde_json::Value, key: &str) -> Option<T> {
            value
                .get(key)
                .filter(|v| !v.is_null())
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        }
        Self {
            segmentation: field(value, "segmentation"),
            external_assessor: field(value, "external_assessor"),
            structural_graph: field(value, "structural_graph"),
        }
    }

    /// True when the external assessor flagged a critical hazard.
    pub fn flags_critical_hazard(&self) -> bool {
        self.external_assessor
            .as_ref()
            .is_some_and(|e| e.has_critical_hazards)
    }
}
