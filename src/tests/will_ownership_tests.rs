#[cfg(test)]
mod tests {
    use crate::errors::RegistryError;
    use crate::models::common::PrincipalId;
    use crate::models::event::RegistryEvent;
    use crate::models::will::WillOwners;
    use crate::tests::fixtures::{ alice, bob, carol, dave, harness };

    #[test]
    fn test_add_will_owner_publishes_event() {
        let h = harness();
        let id = h.alice_cottage();

        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();

        assert!(h.registry.is_will_owner(id, &carol()).unwrap());
        assert!(!h.registry.is_will_owner(id, &dave()).unwrap());
        assert_eq!(
            h.events.events(),
            vec![RegistryEvent::WillOwnerAdded { id, will_owner: carol() }]
        );
    }

    #[test]
    fn test_duplicate_will_owner_is_kept_and_removed_one_at_a_time() {
        let h = harness();
        let id = h.alice_cottage();

        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();
        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();
        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![carol(), carol()]);

        h.registry.remove_will_ownership(&alice(), id, &carol()).unwrap();
        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![carol()]);
        assert!(h.registry.is_will_owner(id, &carol()).unwrap());

        h.registry.remove_will_ownership(&alice(), id, &carol()).unwrap();
        assert!(h.registry.get_will_owners(id).unwrap().is_empty());
        assert!(!h.registry.is_will_owner(id, &carol()).unwrap());
    }

    #[test]
    fn test_remove_single_entry_keeps_other_members() {
        let h = harness();
        let id = h.alice_cottage();
        for principal in [bob(), carol(), dave()] {
            h.registry.add_will_ownership(&alice(), id, &principal).unwrap();
        }
        h.events.drain();

        h.registry.remove_will_ownership(&alice(), id, &bob()).unwrap();

        let owners = h.registry.get_will_owners(id).unwrap();
        assert_eq!(owners.len(), 2);
        assert!(!h.registry.is_will_owner(id, &bob()).unwrap());
        assert!(h.registry.is_will_owner(id, &carol()).unwrap());
        assert!(h.registry.is_will_owner(id, &dave()).unwrap());
        assert_eq!(
            h.events.events(),
            vec![RegistryEvent::WillOwnerRemoved { id, will_owner: bob() }]
        );
    }

    #[test]
    fn test_removal_moves_last_entry_into_the_gap() {
        let h = harness();
        let id = h.alice_cottage();
        for principal in [bob(), carol(), dave()] {
            h.registry.add_will_ownership(&alice(), id, &principal).unwrap();
        }

        h.registry.remove_will_ownership(&alice(), id, &bob()).unwrap();

        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![dave(), carol()]);
    }

    #[test]
    fn test_removing_absent_will_owner_is_a_silent_no_op() {
        let h = harness();
        let id = h.alice_cottage();
        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();
        h.events.drain();

        h.registry.remove_will_ownership(&alice(), id, &dave()).unwrap();

        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![carol()]);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_will_management_is_owner_gated() {
        let h = harness();
        let id = h.alice_cottage();
        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();
        h.events.drain();

        let result = h.registry.add_will_ownership(&carol(), id, &carol());
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));

        // A will owner has no rights over the list either
        let result = h.registry.remove_will_ownership(&carol(), id, &carol());
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));

        // Even a no-op removal is checked first
        let result = h.registry.remove_will_ownership(&bob(), id, &dave());
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));

        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![carol()]);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_will_owners_survive_ownership_transfer() {
        let h = harness();
        let id = h.alice_cottage();
        h.registry.add_will_ownership(&alice(), id, &carol()).unwrap();

        h.registry.transfer_property(&alice(), id, &bob()).unwrap();

        assert_eq!(h.registry.get_will_owners(id).unwrap(), vec![carol()]);
        h.registry.remove_will_ownership(&bob(), id, &carol()).unwrap();
        assert!(h.registry.get_will_owners(id).unwrap().is_empty());
    }

    #[test]
    fn test_will_owners_bag_semantics() {
        let zero = PrincipalId::unset();
        assert!(!WillOwners::new().remove_first(&carol()));

        let mut bag = WillOwners::from(vec![carol(), zero.clone()]);
        bag.add(carol());

        assert_eq!(bag.len(), 3);
        assert_eq!(bag.occurrences(&carol()), 2);
        assert!(bag.contains(&zero));

        assert!(bag.remove_first(&carol()));
        assert_eq!(bag.as_slice(), &[carol(), zero.clone()]);
        assert_eq!(bag.occurrences(&carol()), 1);
    }
}
