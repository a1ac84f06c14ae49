//! Row-level SQL operations, one module per table family.

pub mod aggregation;
pub mod calibration_ops;
pub mod correction_ops;
pub mod decision_ops;
pub mod job_ops;
pub mod lease_ops;
pub mod registry_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use surveyor_core::errors::SurveyorResult;

use crate::to_storage_err;

/// Timestamps are stored as fixed-width RFC 3339 UTC text so that string
/// comparison orders them chronologically.
pub(crate) fn fmt_dt(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_dt(s: &str) -> SurveyorResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> SurveyorResult<String> {
    serde_json::to_string(value).map_err(|e| to_storage_err(e.to_string()))
}

pub(crate) fn from_json_opt<T: serde::de::DeserializeOwned>(
    raw: Option<String>,
    what: &str,
) -> SurveyorResult<Option<T>> {
    raw.map(|s| {
        serde_json::from_str(&s).map_err(|e| to_storage_err(format!("parse {what}: {e}")))
    })
    .transpose()
}
