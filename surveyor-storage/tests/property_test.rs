//! Property tests: registry and correction invariants under arbitrary op sequences.

use proptest::prelude::*;
use surveyor_core::models::{CorrectionStatus, ModelRegistryEntry, TrainingCorrection};
use surveyor_core::traits::{ICorrectionStorage, IModelRegistry};
use surveyor_storage::StorageEngine;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn at_most_one_active_model(activations in prop::collection::vec(0usize..4, 1..12)) {
        let storage = StorageEngine::open_in_memory().unwrap();
        let entries: Vec<ModelRegistryEntry> = (0..4)
            .map(|i| ModelRegistryEntry::new("internal_damage_classifier", &format!("v{i}")))
            .collect();
        for e in &entries {
            storage.register_model(e).unwrap();
        }
        for idx in &activations {
            storage.activate_model(&entries[*idx].id).unwrap();
            let active: Vec<_> = storage
                .list_models("internal_damage_classifier")
                .unwrap()
                .into_iter()
                .filter(|m| m.is_active)
                .collect();
            prop_assert_eq!(active.len(), 1);
            prop_assert_eq!(&active[0].id, &entries[*idx].id);
        }
    }

    #[test]
    fn corrections_consumed_at_most_once(batches in prop::collection::vec(1usize..6, 1..5)) {
        let storage = StorageEngine::open_in_memory().unwrap();
        for i in 0..12 {
            let c = TrainingCorrection::new(&format!("img/{i}.jpg"), vec![]);
            storage.submit_correction(&c).unwrap();
            storage.set_correction_status(&c.id, CorrectionStatus::Approved).unwrap();
        }
        let mut consumed = 0;
        for (n, limit) in batches.iter().enumerate() {
            let batch: Vec<String> = storage
                .approved_unused(*limit)
                .unwrap()
                .into_iter()
                .map(|c| c.id)
                .collect();
            consumed += storage.mark_used(&batch, &format!("v{n}")).unwrap();
            prop_assert_eq!(storage.count_approved_unused().unwrap(), 12 - consumed);
        }
        prop_assert!(consumed <= 12);
    }
}
