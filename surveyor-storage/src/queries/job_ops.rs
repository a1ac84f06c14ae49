//! Retraining job records and the job state machine guard.

use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::{ModelRegistryEntry, RetrainingJob, RetrainingJobStatus};

use super::{correction_ops, fmt_dt, from_json_opt, parse_dt, registry_ops, to_json};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT id, status, corrections_count, model_version, onnx_path,
        metrics, error, created_at, started_at, completed_at
     FROM retraining_jobs";

pub fn create_job(conn: &Connection, job: &RetrainingJob) -> SurveyorResult<()> {
    conn.execute(
        "INSERT INTO retraining_jobs (
            id, status, corrections_count, model_version, onnx_path, metrics,
            error, created_at, started_at, completed_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            job.id,
            job.status.as_str(),
            job.corrections_count as i64,
            job.model_version,
            job.onnx_path,
            job.metrics.as_ref().map(to_json).transpose()?,
            job.error,
            fmt_dt(&job.created_at),
            job.started_at.as_ref().map(fmt_dt),
            job.completed_at.as_ref().map(fmt_dt),
        ],
    )
    .map_err(|e| to_storage_err(format!("create_job {}: {e}", job.id)))?;
    Ok(())
}

/// Overwrite a job row. Terminal jobs cannot change, and a status change
/// must follow `pending → running → {completed | failed}`.
pub fn update_job(conn: &Connection, job: &RetrainingJob) -> SurveyorResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("update_job begin: {e}")))?;

    match update_job_inner(&tx, job) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("update_job commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn update_job_inner(conn: &Connection, job: &RetrainingJob) -> SurveyorResult<()> {
    let current = get_job(conn, &job.id)?
        .ok_or_else(|| SurveyorError::JobNotFound { id: job.id.clone() })?;

    if current.status.is_terminal() {
        return Err(SurveyorError::TerminalJobImmutable {
            id: job.id.clone(),
            status: current.status.to_string(),
        });
    }
    if current.status != job.status && !current.status.can_transition_to(job.status) {
        return Err(SurveyorError::InvalidInput {
            field: "status".to_string(),
            reason: format!(
                "job {} cannot move from {} to {}",
                job.id, current.status, job.status
            ),
        });
    }

    conn.execute(
        "UPDATE retraining_jobs SET
            status = ?2, corrections_count = ?3, model_version = ?4, onnx_path = ?5,
            metrics = ?6, error = ?7, started_at = ?8, completed_at = ?9
         WHERE id = ?1",
        params![
            job.id,
            job.status.as_str(),
            job.corrections_count as i64,
            job.model_version,
            job.onnx_path,
            job.metrics.as_ref().map(to_json).transpose()?,
            job.error,
            job.started_at.as_ref().map(fmt_dt),
            job.completed_at.as_ref().map(fmt_dt),
        ],
    )
    .map_err(|e| to_storage_err(format!("update_job {}: {e}", job.id)))?;
    Ok(())
}

/// Finish a successful run in one transaction: consume the corrections,
/// register the model, and write the job as completed. Nothing is kept if
/// any step fails. The returned entry carries the number of corrections
/// actually consumed as its `sample_count`.
pub fn complete_job(
    conn: &Connection,
    job: &RetrainingJob,
    model: &ModelRegistryEntry,
    correction_ids: &[String],
) -> SurveyorResult<ModelRegistryEntry> {
    if job.status != RetrainingJobStatus::Completed {
        return Err(SurveyorError::InvalidInput {
            field: "status".to_string(),
            reason: format!("job {} must be completed, got {}", job.id, job.status),
        });
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("complete_job begin: {e}")))?;

    match complete_job_inner(&tx, job, model, correction_ids) {
        Ok(entry) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("complete_job commit: {e}")))?;
            Ok(entry)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn complete_job_inner(
    conn: &Connection,
    job: &RetrainingJob,
    model: &ModelRegistryEntry,
    correction_ids: &[String],
) -> SurveyorResult<ModelRegistryEntry> {
    let marked = correction_ops::mark_used_in(conn, correction_ids, &model.version)?;
    let mut entry = model.clone();
    entry.sample_count = marked as u64;
    registry_ops::register_model(conn, &entry)?;
    update_job_inner(conn, job)?;
    Ok(entry)
}

pub fn get_job(conn: &Connection, id: &str) -> SurveyorResult<Option<RetrainingJob>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![id], |row| Ok(row_to_job(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// The most recently completed job, used for the retraining interval check.
pub fn last_completed_job(conn: &Connection) -> SurveyorResult<Option<RetrainingJob>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE status = ?1 ORDER BY completed_at DESC LIMIT 1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![RetrainingJobStatus::Completed.as_str()], |row| {
            Ok(row_to_job(row))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// Jobs newest first.
pub fn list_jobs(conn: &Connection, limit: usize) -> SurveyorResult<Vec<RetrainingJob>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_job(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut jobs = Vec::new();
    for row in rows {
        jobs.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(jobs)
}

fn row_to_job(row: &rusqlite::Row<'_>) -> SurveyorResult<RetrainingJob> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let status: String = row.get(1).map_err(get_err)?;
    let corrections_count: i64 = row.get(2).map_err(get_err)?;
    let created_at: String = row.get(7).map_err(get_err)?;
    let started_at: Option<String> = row.get(8).map_err(get_err)?;
    let completed_at: Option<String> = row.get(9).map_err(get_err)?;
    Ok(RetrainingJob {
        id: row.get(0).map_err(get_err)?,
        status: status.parse::<RetrainingJobStatus>()?,
        corrections_count: corrections_count.max(0) as usize,
        model_version: row.get(3).map_err(get_err)?,
        onnx_path: row.get(4).map_err(get_err)?,
        metrics: from_json_opt(row.get(5).map_err(get_err)?, "metrics")?,
        error: row.get(6).map_err(get_err)?,
        created_at: parse_dt(&created_at)?,
        started_at: started_at.as_deref().map(parse_dt).transpose()?,
        completed_at: completed_at.as_deref().map(parse_dt).transpose()?,
    })
}
