//! Model registry CRUD and atomic activation.

use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::ModelRegistryEntry;

use super::{fmt_dt, parse_dt};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT id, model_type, version, accuracy, sample_count,
        is_active, artifact_path, created_at
     FROM model_registry";

/// Insert a registry entry. `(model_type, version)` must be unique.
pub fn register_model(conn: &Connection, entry: &ModelRegistryEntry) -> SurveyorResult<()> {
    conn.execute(
        "INSERT INTO model_registry (
            id, model_type, version, accuracy, sample_count, is_active,
            artifact_path, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id,
            entry.model_type,
            entry.version,
            entry.accuracy,
            entry.sample_count as i64,
            entry.is_active,
            entry.artifact_path,
            fmt_dt(&entry.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("register_model {}: {e}", entry.version)))?;
    Ok(())
}

pub fn get_model(conn: &Connection, id: &str) -> SurveyorResult<Option<ModelRegistryEntry>> {
    query_one(conn, &format!("{SELECT_COLUMNS} WHERE id = ?1"), id)
}

/// The active entry for a model type, if one has been activated.
pub fn active_model(
    conn: &Connection,
    model_type: &str,
) -> SurveyorResult<Option<ModelRegistryEntry>> {
    query_one(
        conn,
        &format!("{SELECT_COLUMNS} WHERE model_type = ?1 AND is_active = 1"),
        model_type,
    )
}

/// All entries for a model type, newest first.
pub fn list_models(conn: &Connection, model_type: &str) -> SurveyorResult<Vec<ModelRegistryEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE model_type = ?1 ORDER BY created_at DESC, rowid DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![model_type], |row| Ok(row_to_entry(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(entries)
}

/// Deactivate the current active entry of the same type and activate `id`,
/// in one transaction. Readers never observe zero or two active entries.
pub fn activate_model(conn: &Connection, id: &str) -> SurveyorResult<ModelRegistryEntry> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("activate_model begin: {e}")))?;

    match activate_model_inner(&tx, id) {
        Ok(entry) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("activate_model commit: {e}")))?;
            Ok(entry)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn activate_model_inner(conn: &Connection, id: &str) -> SurveyorResult<ModelRegistryEntry> {
    let mut entry = get_model(conn, id)?
        .ok_or_else(|| SurveyorError::ModelNotFound { id: id.to_string() })?;
    if entry.is_active {
        return Ok(entry);
    }

    conn.execute(
        "UPDATE model_registry SET is_active = 0 WHERE model_type = ?1 AND is_active = 1",
        params![entry.model_type],
    )
    .map_err(|e| to_storage_err(format!("deactivate {}: {e}", entry.model_type)))?;
    conn.execute(
        "UPDATE model_registry SET is_active = 1 WHERE id = ?1",
        params![id],
    )
    .map_err(|e| to_storage_err(format!("activate {id}: {e}")))?;

    entry.is_active = true;
    Ok(entry)
}

fn query_one(
    conn: &Connection,
    sql: &str,
    param: &str,
) -> SurveyorResult<Option<ModelRegistryEntry>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![param], |row| Ok(row_to_entry(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> SurveyorResult<ModelRegistryEntry> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let sample_count: i64 = row.get(4).map_err(get_err)?;
    let created_at: String = row.get(7).map_err(get_err)?;
    Ok(ModelRegistryEntry {
        id: row.get(0).map_err(get_err)?,
        model_type: row.get(1).map_err(get_err)?,
        version: row.get(2).map_err(get_err)?,
        accuracy: row.get(3).map_err(get_err)?,
        sample_count: sample_count.max(0) as u64,
        is_active: row.get(5).map_err(get_err)?,
        artifact_path: row.get(6).map_err(get_err)?,
        created_at: parse_dt(&created_at)?,
    })
}
