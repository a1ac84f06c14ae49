//! File-backed storage: migrations, read pool visibility, concurrent writers.

use std::sync::Arc;

use surveyor_core::models::{ModelRegistryEntry, TrainingCorrection};
use surveyor_core::traits::{ICorrectionStorage, IModelRegistry};
use surveyor_storage::migrations::LATEST_VERSION;
use surveyor_storage::StorageEngine;

#[test]
fn reopen_preserves_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surveyor.db");

    let entry = ModelRegistryEntry::new("internal_damage_classifier", "v1");
    {
        let storage = StorageEngine::open(&path).unwrap();
        assert_eq!(storage.schema_version(), LATEST_VERSION);
        storage.register_model(&entry).unwrap();
    }

    let storage = StorageEngine::open(&path).unwrap();
    assert_eq!(storage.schema_version(), LATEST_VERSION);
    let loaded = storage.get_model(&entry.id).unwrap().unwrap();
    assert_eq!(loaded.version, "v1");
}

#[test]
fn readers_see_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageEngine::open(&dir.path().join("surveyor.db")).unwrap();
    assert!(storage.pool().readers.is_some());

    for i in 0..10 {
        let c = TrainingCorrection::new(&format!("img/{i}.jpg"), vec![]);
        storage.submit_correction(&c).unwrap();
        assert!(storage.get_correction(&c.id).unwrap().is_some());
    }
}

#[test]
fn concurrent_writers_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open(&dir.path().join("surveyor.db")).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let storage = Arc::clone(&storage);
            std::thread::spawn(move || {
                for i in 0..25 {
                    let c = TrainingCorrection::new(&format!("img/{t}-{i}.jpg"), vec![]);
                    storage.submit_correction(&c).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let conn_count = storage
        .pool()
        .writer
        .with_conn_sync(|conn| {
            Ok(conn
                .query_row("SELECT COUNT(*) FROM training_corrections", [], |r| {
                    r.get::<_, i64>(0)
                })
                .unwrap())
        })
        .unwrap();
    assert_eq!(conn_count, 100);
}
