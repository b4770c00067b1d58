use std::collections::BTreeMap;
use std::sync::{ Mutex, MutexGuard };

use log::{ debug, warn };

use crate::config::RegistryOptions;
use crate::errors::{ RegistryError, RegistryResult };
use crate::models::common::{ PrincipalId, PropertyId, Timestamp };
use crate::models::event::RegistryEvent;
use crate::models::property::{ NewProperty, Property, PropertyDetails, Standing };
use crate::models::snapshot::RegistrySnapshot;
use crate::traits::{ Clock, EventSink, SnapshotStore };

/// What a mutation did to the draft record
enum Change {
    /// Store the draft, optionally announcing it
    Keep(Option<RegistryEvent>),
    /// Drop the record so reads fall back to the zero value
    Clear(RegistryEvent),
    /// Nothing to store or announce
    Unchanged,
}

/// Who may invoke a mutation
enum Gate<'a> {
    Owner(&'a PrincipalId),
    Anyone,
}

struct RegistryState<S> {
    last_issued_id: u64,
    records: BTreeMap<PropertyId, Property>,
    store: S,
}

impl<S: SnapshotStore> RegistryState<S> {
    fn record(&self, id: PropertyId) -> Property {
        self.records.get(&id).cloned().unwrap_or_default()
    }

    /// Replace (or clear) one record and advance the id sequence, persisting
    /// the result. On a storage failure memory is rolled back to match what
    /// the store still holds.
    fn commit(
        &mut self,
        id: PropertyId,
        record: Option<Property>,
        last_issued_id: u64
    ) -> RegistryResult<()> {
        let previous_id = self.last_issued_id;
        let previous = match record {
            Some(record) => self.records.insert(id, record),
            None => self.records.remove(&id),
        };
        self.last_issued_id = last_issued_id;

        let snapshot = RegistrySnapshot::from_records(self.last_issued_id, &self.records);
        if let Err(e) = self.store.persist(&snapshot) {
            match previous {
                Some(previous) => {
                    self.records.insert(id, previous);
                }
                None => {
                    self.records.remove(&id);
                }
            }
            self.last_issued_id = previous_id;
            return Err(e);
        }
        Ok(())
    }
}

/// The property registry.
///
/// Every operation holds the registry lock from the first read to the last
/// write, reads "now" once from the injected clock, and either commits fully
/// (persisting, then publishing at most one event) or fails with nothing
/// changed and nothing published.
pub struct PropertyRegistry<S, C, E> where S: SnapshotStore, C: Clock, E: EventSink {
    state: Mutex<RegistryState<S>>,
    clock: C,
    sink: E,
    options: RegistryOptions,
}

impl<S, C, E> PropertyRegistry<S, C, E> where S: SnapshotStore, C: Clock, E: EventSink {
    /// Open a registry over `store` with default options
    pub fn open(store: S, clock: C, sink: E) -> RegistryResult<Self> {
        Self::open_with_options(store, clock, sink, RegistryOptions::default())
    }

    pub fn open_with_options(
        store: S,
        clock: C,
        sink: E,
        options: RegistryOptions
    ) -> RegistryResult<Self> {
        let snapshot = store.restore()?;
        let last_issued_id = snapshot.last_issued_id;
        let records = snapshot.into_records();
        debug!(
            "Opened registry with {} properties, last issued id {}",
            records.len(),
            last_issued_id
        );
        Ok(PropertyRegistry {
            state: Mutex::new(RegistryState { last_issued_id, records, store }),
            clock,
            sink,
            options,
        })
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, RegistryState<S>>> {
        self.state.lock().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read<T>(&self, id: PropertyId, view: impl FnOnce(&Property) -> T) -> RegistryResult<T> {
        let state = self.lock()?;
        Ok(match state.records.get(&id) {
            Some(record) => view(record),
            None => view(&Property::default()),
        })
    }

    fn mutate<F>(&self, operation: &'static str, gate: Gate<'_>, id: PropertyId, apply: F) -> RegistryResult<()>
        where F: FnOnce(&mut Property, Timestamp) -> RegistryResult<Change>
    {
        let mut state = self.lock()?;
        let now = self.clock.now();
        let current = state.record(id);

        if let Gate::Owner(caller) = gate {
            if !current.is_owned_by(caller) {
                warn!("{} on {} rejected: {} is not the owner", operation, id, caller);
                return Err(RegistryError::Unauthorized { id, caller: caller.clone() });
            }
        }

        let mut draft = current;
        let change = apply(&mut draft, now).map_err(|e| {
            warn!("{} on {} rejected: {}", operation, id, e);
            e
        })?;

        let last_issued_id = state.last_issued_id;
        let event = match change {
            Change::Unchanged => {
                debug!("{} on {} changed nothing", operation, id);
                return Ok(());
            }
            Change::Keep(event) => {
                state.commit(id, Some(draft), last_issued_id)?;
                event
            }
            Change::Clear(event) => {
                state.commit(id, None, last_issued_id)?;
                Some(event)
            }
        };

        debug!("{} on {} committed at {}", operation, id, now);
        if let Some(event) = event {
            self.sink.publish(&event);
        }
        Ok(())
    }

    fn owner_update<F>(&self, operation: &'static str, caller: &PrincipalId, id: PropertyId, update: F) -> RegistryResult<()>
        where F: FnOnce(&mut Property)
    {
        self.mutate(operation, Gate::Owner(caller), id, |record, _| {
            update(record);
            Ok(Change::Keep(None))
        })
    }

    /// Issue a new property owned by `caller` and return its id.
    ///
    /// `last_renewal` is stamped with the current time. The expiry is not
    /// validated, so a property may be created already expired.
    pub fn add_property(&self, caller: &PrincipalId, details: NewProperty) -> RegistryResult<PropertyId> {
        let mut state = self.lock()?;
        let now = self.clock.now();
        let next = state.last_issued_id
            .checked_add(1)
            .ok_or_else(|| RegistryError::Storage("property id sequence exhausted".to_string()))?;
        let id = PropertyId(next);

        let record = Property::issue(id, caller.clone(), details, now);
        state.commit(id, Some(record), next)?;

        debug!("Issued property {} to {}", id, caller);
        self.sink.publish(&(RegistryEvent::PropertyAdded { id, owner: caller.clone() }));
        Ok(id)
    }

    /// Hand the property to `to`. Any principal is accepted, including the
    /// caller and the zero principal.
    pub fn transfer_property(&self, caller: &PrincipalId, id: PropertyId, to: &PrincipalId) -> RegistryResult<()> {
        self.mutate("transfer_property", Gate::Owner(caller), id, |record, _| {
            record.owner = to.clone();
            Ok(
                Change::Keep(
                    Some(RegistryEvent::PropertyTransferred {
                        id,
                        from: caller.clone(),
                        to: to.clone(),
                    })
                )
            )
        })
    }

    /// Clear a property whose expiry has strictly passed
    pub fn expire_property(&self, caller: &PrincipalId, id: PropertyId) -> RegistryResult<()> {
        self.mutate("expire_property", Gate::Owner(caller), id, |record, now| {
            if !record.is_expired_at(now) {
                return Err(RegistryError::NotYetExpired { id, expiry: record.expiry, now });
            }
            Ok(Change::Clear(RegistryEvent::PropertyExpired { id }))
        })
    }

    /// Clear a property regardless of its expiry
    pub fn delete_property(&self, caller: &PrincipalId, id: PropertyId) -> RegistryResult<()> {
        self.mutate("delete_property", Gate::Owner(caller), id, |_, _| {
            Ok(Change::Clear(RegistryEvent::PropertyDeleted { id }))
        })
    }

    /// Every field except the will owners. Unknown and deleted ids read as
    /// all zero values.
    pub fn get_property(&self, id: PropertyId) -> RegistryResult<PropertyDetails> {
        self.read(id, Property::details)
    }

    pub fn get_property_value(&self, id: PropertyId) -> RegistryResult<u128> {
        self.read(id, |record| record.value)
    }

    pub fn add_will_ownership(&self, caller: &PrincipalId, id: PropertyId, will_owner: &PrincipalId) -> RegistryResult<()> {
        self.mutate("add_will_ownership", Gate::Owner(caller), id, |record, _| {
            record.will_owners.add(will_owner.clone());
            Ok(
                Change::Keep(
                    Some(RegistryEvent::WillOwnerAdded {
                        id,
                        will_owner: will_owner.clone(),
                    })
                )
            )
        })
    }

    /// Remove the first occurrence of `will_owner`.
    ///
    /// Removing a principal that is not listed succeeds silently without
    /// publishing anything.
    pub fn remove_will_ownership(
        &self,
        caller: &PrincipalId,
        id: PropertyId,
        will_owner: &PrincipalId
    ) -> RegistryResult<()> {
        self.mutate("remove_will_ownership", Gate::Owner(caller), id, |record, _| {
            if !record.will_owners.remove_first(will_owner) {
                return Ok(Change::Unchanged);
            }
            Ok(
                Change::Keep(
                    Some(RegistryEvent::WillOwnerRemoved {
                        id,
                        will_owner: will_owner.clone(),
                    })
                )
            )
        })
    }

    pub fn get_will_owners(&self, id: PropertyId) -> RegistryResult<Vec<PrincipalId>> {
        self.read(id, |record| record.will_owners.to_vec())
    }

    pub fn is_will_owner(&self, id: PropertyId, principal: &PrincipalId) -> RegistryResult<bool> {
        self.read(id, |record| record.will_owners.contains(principal))
    }

    /// Owner hands the property to its beneficiary, whatever its expiry
    pub fn transfer_ownership_to_beneficiary(&self, caller: &PrincipalId, id: PropertyId) -> RegistryResult<()> {
        self.mutate("transfer_ownership_to_beneficiary", Gate::Owner(caller), id, |record, _| {
            record.owner = record.beneficiary.clone();
            Ok(
                Change::Keep(
                    Some(RegistryEvent::PropertyTransferred {
                        id,
                        from: caller.clone(),
                        to: record.beneficiary.clone(),
                    })
                )
            )
        })
    }

    /// Hand the property to its beneficiary once the renewal window has lapsed.
    ///
    /// Anyone may call this. The published transfer names the caller as
    /// `from`, not the previous owner.
    pub fn auto_transfer(&self, caller: &PrincipalId, id: PropertyId) -> RegistryResult<()> {
        let threshold = self.options.auto_transfer_after_secs;
        self.mutate("auto_transfer", Gate::Anyone, id, |record, now| {
            let eligible_after = record.last_renewal.saturating_add_secs(threshold);
            if record.id.is_unset() || !record.is_auto_transfer_eligible_at(now, threshold) {
                return Err(RegistryError::NotEligible { id, eligible_after });
            }
            record.owner = record.beneficiary.clone();
            Ok(
                Change::Keep(
                    Some(RegistryEvent::PropertyTransferred {
                        id,
                        from: caller.clone(),
                        to: record.beneficiary.clone(),
                    })
                )
            )
        })
    }

    pub fn is_property_expired(&self, id: PropertyId) -> RegistryResult<bool> {
        let now = self.clock.now();
        self.read(id, |record| record.is_expired_at(now))
    }

    pub fn is_property_renewable(&self, id: PropertyId) -> RegistryResult<bool> {
        let now = self.clock.now();
        self.read(id, |record| record.is_renewable_at(now))
    }

    /// Derived classification of the record at the current time
    pub fn standing(&self, id: PropertyId) -> RegistryResult<Standing> {
        let now = self.clock.now();
        let threshold = self.options.auto_transfer_after_secs;
        self.read(id, |record| {
            let mut standing = record.standing_at(now, threshold);
            standing.id = id;
            standing
        })
    }

    pub fn update_property_expiry(&self, caller: &PrincipalId, id: PropertyId, expiry: Timestamp) -> RegistryResult<()> {
        self.mutate("update_property_expiry", Gate::Owner(caller), id, |record, now| {
            if expiry <= now {
                return Err(RegistryError::InvalidExpiry { id, requested: expiry, now });
            }
            record.expiry = expiry;
            Ok(Change::Keep(None))
        })
    }

    /// Stamp an arbitrary renewal time. Past and future values are both accepted.
    pub fn update_last_renewal(&self, caller: &PrincipalId, id: PropertyId, renewed_at: Timestamp) -> RegistryResult<()> {
        self.mutate("update_last_renewal", Gate::Owner(caller), id, |record, _| {
            record.last_renewal = renewed_at;
            Ok(Change::Keep(Some(RegistryEvent::PropertyRenewed { id })))
        })
    }

    pub fn update_beneficiary_and_expiry(
        &self,
        caller: &PrincipalId,
        id: PropertyId,
        beneficiary: &PrincipalId,
        expiry: Timestamp
    ) -> RegistryResult<()> {
        self.mutate("update_beneficiary_and_expiry", Gate::Owner(caller), id, |record, now| {
            if expiry <= now {
                return Err(RegistryError::InvalidExpiry { id, requested: expiry, now });
            }
            record.beneficiary = beneficiary.clone();
            record.expiry = expiry;
            Ok(Change::Keep(None))
        })
    }

    pub fn update_price_and_value(&self, caller: &PrincipalId, id: PropertyId, price: u128, value: u128) -> RegistryResult<()> {
        self.owner_update("update_price_and_value", caller, id, |record| {
            record.price = price;
            record.value = value;
        })
    }

    pub fn update_location(&self, caller: &PrincipalId, id: PropertyId, location: &str) -> RegistryResult<()> {
        self.owner_update("update_location", caller, id, |record| {
            record.location = location.to_string();
        })
    }

    pub fn update_description(&self, caller: &PrincipalId, id: PropertyId, description: &str) -> RegistryResult<()> {
        self.owner_update("update_description", caller, id, |record| {
            record.description = description.to_string();
        })
    }

    pub fn update_kind(&self, caller: &PrincipalId, id: PropertyId, kind: &str) -> RegistryResult<()> {
        self.owner_update("update_kind", caller, id, |record| {
            record.kind = kind.to_string();
        })
    }

    pub fn update_name(&self, caller: &PrincipalId, id: PropertyId, name: &str) -> RegistryResult<()> {
        self.owner_update("update_name", caller, id, |record| {
            record.name = name.to_string();
        })
    }

    /// Highest id issued so far
    pub fn last_issued_id(&self) -> RegistryResult<PropertyId> {
        Ok(PropertyId(self.lock()?.last_issued_id))
    }

    /// Ids of all live (issued and not cleared) records, ascending
    pub fn property_ids(&self) -> RegistryResult<Vec<PropertyId>> {
        Ok(self.lock()?.records.keys().copied().collect())
    }

    pub fn properties_owned_by(&self, owner: &PrincipalId) -> RegistryResult<Vec<PropertyId>> {
        let state = self.lock()?;
        Ok(
            state.records
                .values()
                .filter(|record| record.is_owned_by(owner))
                .map(|record| record.id)
                .collect()
        )
    }
}
