//! FusionEngine: weighted posterior mean with epistemic/aleatoric variance.

use std::sync::RwLock;

use tracing::{debug, warn};

use surveyor_core::config::FusionConfig;
use surveyor_core::errors::FusionError;
use surveyor_core::models::{EvidenceWeights, FusionResult, NormalizedEvidence, RawEvidence};
use surveyor_observability::tracing_setup::events;

use crate::normalizer::EvidenceNormalizer;
use crate::{uncertainty, weights};

/// Fuses normalized evidence. Holds the base weights, read from the weight
/// file once at construction and refreshed only by `reload_weights`.
pub struct FusionEngine {
    config: FusionConfig,
    base_weights: RwLock<EvidenceWeights>,
    normalizer: EvidenceNormalizer,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        let base = resolve_base_weights(&config);
        Self {
            config,
            base_weights: RwLock::new(base),
            normalizer: EvidenceNormalizer::new(),
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Current base weights (file weights if valid, else defaults).
    pub fn base_weights(&self) -> EvidenceWeights {
        *self
            .base_weights
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Re-read the weight file. Returns the weights now in effect.
    pub fn reload_weights(&self) -> EvidenceWeights {
        let base = resolve_base_weights(&self.config);
        let mut guard = self
            .base_weights
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = base;
        base
    }

    pub fn normalizer(&self) -> &EvidenceNormalizer {
        &self.normalizer
    }

    /// Normalize then fuse raw evidence.
    pub fn fuse_raw(&self, raw: &RawEvidence) -> (NormalizedEvidence, FusionResult) {
        let evidence = self.normalizer.normalize(raw);
        let result = self.fuse(&evidence);
        (evidence, result)
    }

    /// Fuse evidence. Never fails: any error yields `FusionResult::conservative()`.
    pub fn fuse(&self, evidence: &NormalizedEvidence) -> FusionResult {
        let _span = surveyor_observability::fusion_span!(evidence.available_count()).entered();
        match self.try_fuse(evidence) {
            Ok(result) => result,
            Err(e) => {
                events::fusion_degraded(&e.to_string());
                FusionResult::conservative()
            }
        }
    }

    /// Fuse evidence, reporting why it could not be fused.
    pub fn try_fuse(&self, evidence: &NormalizedEvidence) -> Result<FusionResult, FusionError> {
        validate_evidence(evidence)?;

        let base = self.base_weights();
        weights::validate(&base)?;
        let w = weights::renormalize(&base, evidence);

        let mean: f64 = evidence
            .iter()
            .map(|i| w.get(i.source) * i.probability)
            .sum();
        let epistemic =
            uncertainty::epistemic_variance(&w, &self.config.source_variances, evidence);
        let aleatoric = uncertainty::aleatoric_variance(&w, evidence);
        let variance = epistemic + aleatoric;

        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(FusionError::NonFiniteResult { mean, variance });
        }
        let mean = mean.clamp(0.0, 1.0);
        let std_dev = variance.sqrt();

        let result = FusionResult {
            mean,
            variance,
            epistemic_variance: epistemic,
            aleatoric_variance: aleatoric,
            confidence_interval: uncertainty::confidence_interval(
                mean,
                std_dev,
                self.config.interval_sigmas,
            ),
            uncertainty_level: uncertainty::uncertainty_level(
                mean,
                std_dev,
                self.config.low_uncertainty_cv,
                self.config.medium_uncertainty_cv,
            ),
            weights_used: w,
            sources_available: evidence.available_count(),
            degraded: false,
        };
        debug!(
            mean = result.mean,
            variance = result.variance,
            uncertainty = ?result.uncertainty_level,
            "evidence fused"
        );
        Ok(result)
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(FusionConfig::default())
    }
}

/// File weights when configured and valid, otherwise the configured defaults.
fn resolve_base_weights(config: &FusionConfig) -> EvidenceWeights {
    let Some(path) = config.weights_path.as_deref() else {
        return config.default_weights;
    };
    match weights::load_weights_file(path) {
        Ok(w) => {
            debug!(path = %path.display(), "fusion weights loaded");
            w
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "weight file rejected, using defaults");
            config.default_weights
        }
    }
}

fn validate_evidence(evidence: &NormalizedEvidence) -> Result<(), FusionError> {
    for item in evidence.iter() {
        for (field, value) in [("probability", item.probability), ("confidence", item.confidence)] {
            if !value.is_finite() {
                return Err(FusionError::NonFiniteInput {
                    source_id: item.source.to_string(),
                    field: field.to_string(),
                });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(FusionError::OutOfRange {
                    source_id: item.source.to_string(),
                    field: field.to_string(),
                    value,
                });
            }
        }
    }
    Ok(())
}
