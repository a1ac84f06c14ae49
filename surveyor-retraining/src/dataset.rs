//! Materializes corrections as a YOLO dataset merged with the base dataset.
//!
//! Layout under `<work_dir>/<job_id>/`:
//! - `images/<correction_id>.<ext>`, a hard link (or copy) of the corrected image
//! - `labels/<correction_id>.txt`, one YOLO label line per box
//! - `images.txt`, absolute paths of the linked images
//! - `data.yaml`, training sources and class names
//!
//! The trainer finds a label by swapping the last `/images/` of an image path
//! for `/labels/` and its extension for `.txt`, so every listed image pairs
//! with the label file written next to it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use surveyor_core::config::RetrainingConfig;
use surveyor_core::errors::{RetrainingError, SurveyorResult};
use surveyor_core::models::TrainingCorrection;

/// Contents of the YOLO `data.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataYaml {
    pub train: Vec<String>,
    pub val: String,
    pub nc: usize,
    pub names: Vec<String>,
}

/// A dataset written to disk for one job.
#[derive(Debug, Clone)]
pub struct MaterializedDataset {
    pub dir: PathBuf,
    pub data_yaml: PathBuf,
    pub images_list: PathBuf,
    /// Corrections that made it into the dataset. Corrections whose image
    /// could not be read are left out and stay available for later runs.
    pub correction_ids: Vec<String>,
    /// Number of label lines written across all corrections.
    pub label_count: usize,
    /// blake3 over correction ids and label lines, hex encoded.
    pub fingerprint: String,
}

pub fn materialize(
    config: &RetrainingConfig,
    job_id: &str,
    corrections: &[TrainingCorrection],
) -> SurveyorResult<MaterializedDataset> {
    let dir = config.work_dir.join(job_id);
    let images_dir = dir.join("images");
    let labels_dir = dir.join("labels");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&labels_dir)?;
    let images_dir = fs::canonicalize(&images_dir)?;

    let mut hasher = blake3::Hasher::new();
    let mut images = String::new();
    let mut correction_ids = Vec::with_capacity(corrections.len());
    let mut label_count = 0;

    for correction in corrections {
        let source = Path::new(&correction.image_path);
        let image = images_dir.join(image_file_name(&correction.id, source));
        if let Err(e) = link_or_copy(source, &image) {
            warn!(
                correction_id = %correction.id,
                image = %correction.image_path,
                error = %e,
                "skipping correction with unreadable image"
            );
            continue;
        }

        let mut lines = String::new();
        for label in &correction.labels {
            if !label.is_valid() {
                warn!(correction_id = %correction.id, "skipping out-of-range label box");
                continue;
            }
            lines.push_str(&label.to_label_line());
            lines.push('\n');
            label_count += 1;
        }
        fs::write(labels_dir.join(format!("{}.txt", correction.id)), &lines)?;

        hasher.update(correction.id.as_bytes());
        hasher.update(b"\0");
        hasher.update(lines.as_bytes());

        images.push_str(&image.display().to_string());
        images.push('\n');
        correction_ids.push(correction.id.clone());
    }

    if correction_ids.is_empty() && !corrections.is_empty() {
        return Err(RetrainingError::NoTrainableImages {
            count: corrections.len(),
        }
        .into());
    }

    let images_list = dir.join("images.txt");
    fs::write(&images_list, &images)?;

    let data = data_yaml(config, &images_list);
    let data_yaml_path = dir.join("data.yaml");
    fs::write(&data_yaml_path, serde_yaml::to_string(&data)?)?;

    let fingerprint = hasher.finalize().to_hex().to_string();
    debug!(
        dir = %dir.display(),
        corrections = correction_ids.len(),
        skipped = corrections.len() - correction_ids.len(),
        labels = label_count,
        fingerprint = %fingerprint,
        "training dataset materialized"
    );

    Ok(MaterializedDataset {
        dir,
        data_yaml: data_yaml_path,
        images_list,
        correction_ids,
        label_count,
        fingerprint,
    })
}

/// `<correction_id>.<ext>`, keeping the source extension (default `jpg`).
fn image_file_name(correction_id: &str, source: &Path) -> String {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or("jpg");
    format!("{correction_id}.{ext}")
}

/// Hard link when source and target share a filesystem, copy otherwise.
fn link_or_copy(source: &Path, target: &Path) -> io::Result<()> {
    if !source.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a file", source.display()),
        ));
    }
    if target.exists() {
        fs::remove_file(target)?;
    }
    match fs::hard_link(source, target) {
        Ok(()) => Ok(()),
        Err(_) => fs::copy(source, target).map(|_| ()),
    }
}

fn data_yaml(config: &RetrainingConfig, images_list: &Path) -> DataYaml {
    let images = config.base_dataset_dir.join("images");
    DataYaml {
        train: vec![
            images.join("train").display().to_string(),
            images_list.display().to_string(),
        ],
        val: images.join("val").display().to_string(),
        nc: config.class_names.len(),
        names: config.class_names.clone(),
    }
}
