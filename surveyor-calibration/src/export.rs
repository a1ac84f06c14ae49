//! Training rows for the offline fusion-weight trainer.

use std::io::Write;

use surveyor_core::errors::SurveyorResult;
use surveyor_core::models::{CalibratedDecision, EvidenceSource};

/// Column names the weight trainer reads.
pub const CSV_HEADER: &str = "sam3_confidence,gpt4_confidence,scene_graph_score,y_true";

/// Write one row per validated decision that carries stored evidence.
/// Absent sources contribute their neutral probability. Returns rows written.
pub fn write_training_csv<W: Write>(
    rows: &[CalibratedDecision],
    mut out: W,
) -> SurveyorResult<usize> {
    writeln!(out, "{CSV_HEADER}")?;
    let mut written = 0;
    for row in rows {
        let (Some(was_correct), Some(evidence)) = (row.was_correct, row.evidence.as_ref()) else {
            continue;
        };
        writeln!(
            out,
            "{:.6},{:.6},{:.6},{}",
            evidence.get(EvidenceSource::Segmentation).probability,
            evidence.get(EvidenceSource::ExternalAssessor).probability,
            evidence.get(EvidenceSource::StructuralGraph).probability,
            u8::from(was_correct),
        )?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
