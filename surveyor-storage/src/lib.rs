//! # surveyor-storage
//!
//! SQLite persistence for `routing_decisions`, `calibration_data`,
//! `model_registry`, `retraining_jobs`, `training_corrections`, and
//! `retraining_leases`. One serialized writer, a round-robin read pool,
//! forward-only migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use surveyor_core::errors::{StorageError, SurveyorError};

/// Wrap a SQLite-level failure message as a `SurveyorError`.
pub(crate) fn to_storage_err(message: String) -> SurveyorError {
    SurveyorError::StorageError(StorageError::SqliteError { message })
}
