use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered model version. At most one entry per `model_type` is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRegistryEntry {
    pub id: String,
    pub model_type: String,
    pub version: String,
    pub accuracy: Option<f64>,
    pub sample_count: u64,
    pub is_active: bool,
    pub artifact_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ModelRegistryEntry {
    /// A new, inactive entry.
    pub fn new(model_type: &str, version: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            model_type: model_type.to_string(),
            version: version.to_string(),
            accuracy: None,
            sample_count: 0,
            is_active: false,
            artifact_path: None,
            created_at: Utc::now(),
        }
    }
}
