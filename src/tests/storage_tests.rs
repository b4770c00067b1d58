#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::errors::{ RegistryError, RegistryResult };
    use crate::implementations::clock::ManualClock;
    use crate::implementations::event_log::{ JsonLinesEventSink, MemoryEventSink };
    use crate::implementations::registry::PropertyRegistry;
    use crate::implementations::store::{ JsonFileStore, MemoryStore };
    use crate::models::common::{ PropertyId, Timestamp };
    use crate::models::event::RegistryEvent;
    use crate::models::snapshot::RegistrySnapshot;
    use crate::traits::snapshot_store::SnapshotStore;
    use crate::tests::fixtures::{ alice, bob, carol, cottage, harness, setup, T0 };

    /// Accepts a fixed number of writes, then fails every one after
    struct FlakyStore {
        inner: MemoryStore,
        writes_left: usize,
    }

    impl SnapshotStore for FlakyStore {
        fn restore(&self) -> RegistryResult<RegistrySnapshot> {
            self.inner.restore()
        }

        fn persist(&mut self, snapshot: &RegistrySnapshot) -> RegistryResult<()> {
            if self.writes_left == 0 {
                return Err(RegistryError::Storage("disk full".to_string()));
            }
            self.writes_left -= 1;
            self.inner.persist(snapshot)
        }
    }

    #[test]
    fn test_every_commit_is_persisted() {
        let h = harness();
        let id = h.alice_cottage();
        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();

        let snapshot = h.store.restore().unwrap();
        assert_eq!(snapshot.last_issued_id, 1);
        assert_eq!(snapshot.properties.len(), 1);
        assert_eq!(snapshot.properties[0].will_owners.as_slice(), &[carol()]);

        h.registry.delete_property(&alice(), id).unwrap();
        let snapshot = h.store.restore().unwrap();
        assert_eq!(snapshot.last_issued_id, 1);
        assert!(snapshot.properties.is_empty());
    }

    #[test]
    fn test_failed_persist_rolls_back_and_publishes_nothing() {
        setup();
        let store = FlakyStore { inner: MemoryStore::new(), writes_left: 1 };
        let events = MemoryEventSink::new();
        let registry = PropertyRegistry::open(
            store,
            ManualClock::at(Timestamp(T0)),
            events.clone()
        ).unwrap();

        let id = registry.add_property(&alice(), cottage()).unwrap();
        events.drain();

        let result = registry.transfer_property(&alice(), id, &bob());
        assert!(matches!(result, Err(RegistryError::Storage(_))));
        assert_eq!(registry.get_property(id).unwrap().owner, alice());

        let result = registry.add_property(&alice(), cottage());
        assert!(matches!(result, Err(RegistryError::Storage(_))));
        assert_eq!(registry.last_issued_id().unwrap(), PropertyId(1));

        let result = registry.delete_property(&alice(), id);
        assert!(matches!(result, Err(RegistryError::Storage(_))));
        assert!(!registry.get_property(id).unwrap().is_vacant());

        assert!(events.is_empty());
    }

    #[test]
    fn test_json_file_store_survives_reopen() {
        setup();
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("estate.json");

        {
            let registry = PropertyRegistry::open(
                JsonFileStore::open(&path).unwrap(),
                ManualClock::at(Timestamp(T0)),
                MemoryEventSink::new()
            ).unwrap();
            let first = registry.add_property(&alice(), cottage()).unwrap();
            let second = registry.add_property(&alice(), cottage()).unwrap();
            registry.add_will_ownership(&alice(), first, &carol()).unwrap();
            registry.add_will_ownership(&alice(), first, &carol()).unwrap();
            registry.delete_property(&alice(), second).unwrap();
        }
        assert!(path.exists());

        let registry = PropertyRegistry::open(
            JsonFileStore::open(&path).unwrap(),
            ManualClock::at(Timestamp(T0 + 60)),
            MemoryEventSink::new()
        ).unwrap();

        assert_eq!(registry.property_ids().unwrap(), vec![PropertyId(1)]);
        assert_eq!(registry.get_will_owners(PropertyId(1)).unwrap(), vec![carol(), carol()]);
        assert_eq!(registry.get_property(PropertyId(1)).unwrap().owner, alice());
        assert!(registry.get_property(PropertyId(2)).unwrap().is_vacant());

        // The sequence continues past the deleted id
        let third = registry.add_property(&bob(), cottage()).unwrap();
        assert_eq!(third, PropertyId(3));
        assert_eq!(registry.get_property(third).unwrap().last_renewal, Timestamp(T0 + 60));
    }

    #[test]
    fn test_json_file_store_admits_one_registry_at_a_time() {
        setup();
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.json");

        let first = PropertyRegistry::open(
            JsonFileStore::open(&path).unwrap(),
            ManualClock::at(Timestamp(T0)),
            MemoryEventSink::new()
        ).unwrap();
        let alices = first.add_property(&alice(), cottage()).unwrap();

        // A second handle would restore the same sequence and reissue the id
        match JsonFileStore::open(&path) {
            Err(RegistryError::StoreLocked(locked)) => assert_eq!(locked, path),
            other => panic!("expected StoreLocked, got {:?}", other),
        }

        drop(first);
        let second = PropertyRegistry::open(
            JsonFileStore::open(&path).unwrap(),
            ManualClock::at(Timestamp(T0)),
            MemoryEventSink::new()
        ).unwrap();
        let bobs = second.add_property(&bob(), cottage()).unwrap();

        assert_eq!(alices, PropertyId(1));
        assert_eq!(bobs, PropertyId(2));
        assert_eq!(second.get_property(alices).unwrap().owner, alice());
        assert_eq!(second.get_property(bobs).unwrap().owner, bob());
    }

    #[test]
    fn test_json_file_store_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        store.persist(&RegistrySnapshot { last_issued_id: 4, properties: Vec::new() }).unwrap();

        assert!(!dir.path().join("estate.json.tmp").exists());
        assert_eq!(store.restore().unwrap().last_issued_id, 4);
    }

    #[test]
    fn test_registry_resumes_from_a_seeded_store() {
        setup();
        let mut property = crate::models::property::Property::issue(
            PropertyId(3),
            alice(),
            cottage(),
            Timestamp(T0)
        );
        property.will_owners.add(carol());
        let store = MemoryStore::with_snapshot(RegistrySnapshot {
            last_issued_id: 3,
            properties: vec![property],
        });

        let registry = PropertyRegistry::open(
            store,
            ManualClock::at(Timestamp(T0)),
            MemoryEventSink::new()
        ).unwrap();

        assert_eq!(registry.property_ids().unwrap(), vec![PropertyId(3)]);
        assert_eq!(registry.properties_owned_by(&alice()).unwrap(), vec![PropertyId(3)]);
        assert!(registry.is_will_owner(PropertyId(3), &carol()).unwrap());
        assert_eq!(registry.add_property(&bob(), cottage()).unwrap(), PropertyId(4));
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json")).unwrap();

        assert_eq!(store.restore().unwrap(), RegistrySnapshot::default());
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path).unwrap().restore();
        assert!(matches!(result, Err(RegistryError::Serialization(_))));
    }

    #[test]
    fn test_large_amounts_survive_the_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        let mut details = cottage();
        details.price = u128::MAX;
        details.value = u128::from(u64::MAX) + 1;
        let mut property = crate::models::property::Property::issue(
            PropertyId(1),
            alice(),
            details,
            Timestamp(T0)
        );
        property.will_owners.add(carol());
        let snapshot = RegistrySnapshot { last_issued_id: 1, properties: vec![property.clone()] };

        store.persist(&snapshot).unwrap();
        assert_eq!(store.restore().unwrap().properties, vec![property]);
    }

    #[test]
    fn test_snapshot_drops_records_beyond_the_sequence() {
        let mut stray = crate::models::property::Property::default();
        stray.id = PropertyId(9);
        stray.owner = alice();
        let snapshot = RegistrySnapshot { last_issued_id: 3, properties: vec![stray] };

        assert!(snapshot.into_records().is_empty());
    }

    #[test]
    fn test_json_lines_journal_reads_back_in_order() {
        setup();
        let dir = tempdir().unwrap();
        let journal = JsonLinesEventSink::new(dir.path().join("events.jsonl"));
        assert!(journal.read_all().unwrap().is_empty());

        let registry = PropertyRegistry::open(
            MemoryStore::new(),
            ManualClock::at(Timestamp(T0)),
            journal.clone()
        ).unwrap();
        let id = registry.add_property(&alice(), cottage()).unwrap();
        registry.add_will_ownership(&alice(), id, &carol()).unwrap();
        registry.update_last_renewal(&alice(), id, Timestamp(T0 + 5)).unwrap();
        registry.transfer_property(&alice(), id, &bob()).unwrap();

        assert_eq!(
            journal.read_all().unwrap(),
            vec![
                RegistryEvent::PropertyAdded { id, owner: alice() },
                RegistryEvent::WillOwnerAdded { id, will_owner: carol() },
                RegistryEvent::PropertyRenewed { id },
                RegistryEvent::PropertyTransferred { id, from: alice(), to: bob() }
            ]
        );
    }

    #[test]
    fn test_paired_sinks_both_receive_events() {
        setup();
        let first = MemoryEventSink::new();
        let second = MemoryEventSink::new();
        let registry = PropertyRegistry::open(
            MemoryStore::new(),
            ManualClock::at(Timestamp(T0)),
            (first.clone(), Some(second.clone()))
        ).unwrap();

        registry.add_property(&alice(), cottage()).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first.events(), second.events());
    }
}
