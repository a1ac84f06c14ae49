pub mod defaults;
mod fusion_config;
mod observability_config;
mod retraining_config;
mod routing_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use fusion_config::{FusionConfig, SourceVariances};
pub use observability_config::ObservabilityConfig;
pub use retraining_config::RetrainingConfig;
pub use routing_config::RoutingConfig;
pub use storage_config::StorageConfig;

use crate::errors::{SurveyorError, SurveyorResult};

/// Top-level configuration. Every section falls back to its defaults when
/// omitted from the TOML source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyorConfig {
    pub storage: StorageConfig,
    pub fusion: FusionConfig,
    pub routing: RoutingConfig,
    pub retraining: RetrainingConfig,
    pub observability: ObservabilityConfig,
}

impl SurveyorConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(source: &str) -> SurveyorResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> SurveyorResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Reject settings that would make routing or retraining incoherent.
    pub fn validate(&self) -> SurveyorResult<()> {
        let routing = &self.routing;
        if !(0.0..=1.0).contains(&routing.medium_confidence_threshold)
            || !(0.0..=1.0).contains(&routing.high_confidence_threshold)
        {
            return Err(SurveyorError::ConfigError(
                "routing thresholds must lie in [0, 1]".to_string(),
            ));
        }
        if routing.medium_confidence_threshold > routing.high_confidence_threshold {
            return Err(SurveyorError::ConfigError(format!(
                "medium threshold {} exceeds high threshold {}",
                routing.medium_confidence_threshold, routing.high_confidence_threshold
            )));
        }
        if self.fusion.low_uncertainty_cv > self.fusion.medium_uncertainty_cv {
            return Err(SurveyorError::ConfigError(
                "low_uncertainty_cv must not exceed medium_uncertainty_cv".to_string(),
            ));
        }
        if self.retraining.max_corrections == 0 {
            return Err(SurveyorError::ConfigError(
                "max_corrections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
