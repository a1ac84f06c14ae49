use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SurveyorError;

/// Review state of a human correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionStatus {
    Pending,
    Approved,
    Rejected,
}

impl CorrectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionStatus {
    type Err = SurveyorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(SurveyorError::InvalidInput {
                field: "status".to_string(),
                reason: format!("unknown correction status '{other}'"),
            }),
        }
    }
}

/// A normalized YOLO bounding box: class id plus center/size in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YoloBox {
    pub class_id: u32,
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloBox {
    /// One line of a YOLO label file.
    pub fn to_label_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.width, self.height
        )
    }

    pub fn is_valid(&self) -> bool {
        [self.cx, self.cy, self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}

/// A human-validated label set for one image, used as training input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCorrection {
    pub id: String,
    pub routing_decision_id: Option<String>,
    pub image_path: String,
    pub labels: Vec<YoloBox>,
    pub status: CorrectionStatus,
    pub used_in_training: bool,
    pub model_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrainingCorrection {
    /// A new correction awaiting review.
    pub fn new(image_path: &str, labels: Vec<YoloBox>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            routing_decision_id: None,
            image_path: image_path.to_string(),
            labels,
            status: CorrectionStatus::Pending,
            used_in_training: false,
            model_version: None,
            created_at: Utc::now(),
        }
    }
}
