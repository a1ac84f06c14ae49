use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::{EvidenceSource, EvidenceWeights};

/// Prior variance per evidence channel, independent of any single request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceVariances {
    pub segmentation: f64,
    pub external_assessor: f64,
    pub structural_graph: f64,
}

impl SourceVariances {
    pub fn get(&self, source: EvidenceSource) -> f64 {
        match source {
            EvidenceSource::Segmentation => self.segmentation,
            EvidenceSource::ExternalAssessor => self.external_assessor,
            EvidenceSource::StructuralGraph => self.structural_graph,
        }
    }
}

impl Default for SourceVariances {
    fn default() -> Self {
        Self {
            segmentation: defaults::DEFAULT_SEGMENTATION_VARIANCE,
            external_assessor: defaults::DEFAULT_EXTERNAL_ASSESSOR_VARIANCE,
            structural_graph: defaults::DEFAULT_STRUCTURAL_GRAPH_VARIANCE,
        }
    }
}

/// Evidence fusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Optional JSON weight file produced by the offline weight trainer.
    pub weights_path: Option<PathBuf>,
    /// Half-width of the confidence interval in standard deviations.
    pub interval_sigmas: f64,
    /// Coefficient of variation below which uncertainty is `low`.
    pub low_uncertainty_cv: f64,
    /// Coefficient of variation below which uncertainty is `medium`.
    pub medium_uncertainty_cv: f64,
    /// Base weights used when no valid weight file is available.
    pub default_weights: EvidenceWeights,
    /// Prior variance per source type.
    pub source_variances: SourceVariances,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights_path: None,
            interval_sigmas: defaults::DEFAULT_INTERVAL_SIGMAS,
            low_uncertainty_cv: defaults::DEFAULT_LOW_UNCERTAINTY_CV,
            medium_uncertainty_cv: defaults::DEFAULT_MEDIUM_UNCERTAINTY_CV,
            default_weights: EvidenceWeights::new(
                defaults::DEFAULT_SEGMENTATION_WEIGHT,
                defaults::DEFAULT_EXTERNAL_ASSESSOR_WEIGHT,
                defaults::DEFAULT_STRUCTURAL_GRAPH_WEIGHT,
            ),
            source_variances: SourceVariances::default(),
        }
    }
}
