//! Locates what a finished training run produced.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use surveyor_core::errors::{RetrainingError, SurveyorResult};

/// Model version reported on the training process's stdout, or a
/// timestamped fallback when the process did not print one.
pub fn parse_model_version(stdout: &str, now: DateTime<Utc>) -> String {
    static VERSION_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| Regex::new(r"Model version:\s*(\S+)").ok());

    re.as_ref()
        .and_then(|re| re.captures_iter(stdout).last())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| fallback_version(now))
}

pub fn fallback_version(now: DateTime<Utc>) -> String {
    format!("continuous-learning-v{}", now.format("%Y%m%d_%H%M%S"))
}

/// Newest `*.onnx` file in `dir` by modification time.
pub fn newest_onnx(dir: &Path) -> SurveyorResult<PathBuf> {
    let missing = || RetrainingError::ArtifactMissing {
        dir: dir.display().to_string(),
    };
    let entries = fs::read_dir(dir).map_err(|_| missing())?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("onnx") {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    let (_, path) = newest.ok_or_else(missing)?;
    debug!(path = %path.display(), "model artifact located");
    Ok(path)
}

/// `metrics` object from `model-metadata-<version>.json`. Absent or
/// unreadable metadata is not an error.
pub fn load_metrics(dir: &Path, version: &str) -> Option<serde_json::Value> {
    let path = dir.join(format!("model-metadata-{version}.json"));
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(mut meta) => meta.get_mut("metrics").map(serde_json::Value::take),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "model metadata is not valid JSON");
            None
        }
    }
}

/// `mAP50` from a metrics object, used as the registry accuracy.
pub fn map50(metrics: &serde_json::Value) -> Option<f64> {
    metrics.get("mAP50").and_then(serde_json::Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn parses_reported_version() {
        let out = "Loading...\n   Model version: 20260101_120000\nEpochs: 50\n";
        assert_eq!(parse_model_version(out, Utc::now()), "20260101_120000");
    }

    #[test]
    fn falls_back_to_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            parse_model_version("no version here", now),
            "continuous-learning-v20260304_050607"
        );
    }

    #[test]
    fn newest_onnx_by_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let old = tmp.path().join("a.onnx");
        let new = tmp.path().join("b.onnx");
        fs::write(&old, b"old").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::write(&new, b"new").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(past)
            .unwrap();

        assert_eq!(newest_onnx(tmp.path()).unwrap(), new);
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(newest_onnx(tmp.path()).is_err());
        assert!(newest_onnx(&tmp.path().join("absent")).is_err());
    }

    #[test]
    fn metrics_are_optional() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_metrics(tmp.path(), "v1").is_none());

        fs::write(
            tmp.path().join("model-metadata-v1.json"),
            r#"{"version":"v1","metrics":{"mAP50":0.71,"precision":0.8}}"#,
        )
        .unwrap();
        let metrics = load_metrics(tmp.path(), "v1").unwrap();
        assert_eq!(map50(&metrics), Some(0.71));

        fs::write(tmp.path().join("model-metadata-v2.json"), "{not json").unwrap();
        assert!(load_metrics(tmp.path(), "v2").is_none());
    }
}
