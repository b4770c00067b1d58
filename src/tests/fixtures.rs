use log::info;

use crate::config::RegistryOptions;
use crate::implementations::clock::ManualClock;
use crate::implementations::event_log::MemoryEventSink;
use crate::implementations::registry::PropertyRegistry;
use crate::implementations::store::MemoryStore;
use crate::models::common::{ PrincipalId, PropertyId, Timestamp, SECONDS_PER_DAY };
use crate::models::property::NewProperty;

pub type TestRegistry = PropertyRegistry<MemoryStore, ManualClock, MemoryEventSink>;

/// 2023-11-14T22:13:20Z
pub const T0: u64 = 1_700_000_000;
pub const YEAR: u64 = 365 * SECONDS_PER_DAY;

pub struct Harness {
    pub registry: TestRegistry,
    pub clock: ManualClock,
    pub events: MemoryEventSink,
    pub store: MemoryStore,
}

// Initialize logging once; later calls are harmless
pub fn setup() {
    if env_logger::builder().is_test(true).try_init().is_ok() {
        info!("Logger initialized");
    }
}

pub fn harness() -> Harness {
    harness_with_options(RegistryOptions::default())
}

pub fn harness_with_options(options: RegistryOptions) -> Harness {
    setup();
    let clock = ManualClock::at(Timestamp(T0));
    let events = MemoryEventSink::new();
    let store = MemoryStore::new();
    let registry = PropertyRegistry::open_with_options(
        store.clone(),
        clock.clone(),
        events.clone(),
        options
    ).expect("memory store always restores");
    Harness { registry, clock, events, store }
}

pub fn alice() -> PrincipalId {
    PrincipalId::new("alice")
}

pub fn bob() -> PrincipalId {
    PrincipalId::new("bob")
}

pub fn carol() -> PrincipalId {
    PrincipalId::new("carol")
}

pub fn dave() -> PrincipalId {
    PrincipalId::new("dave")
}

/// A cottage expiring one year after T0, passing to bob
pub fn cottage() -> NewProperty {
    NewProperty {
        name: "Lakeside Cottage".to_string(),
        kind: "residential".to_string(),
        price: 250_000,
        value: 310_000,
        location: "12 Shore Road".to_string(),
        description: "Two bedrooms, boathouse".to_string(),
        expiry: Timestamp(T0 + YEAR),
        beneficiary: bob(),
    }
}

impl Harness {
    /// Registers the cottage as alice and clears the creation event
    pub fn alice_cottage(&self) -> PropertyId {
        let id = self.registry.add_property(&alice(), cottage()).expect("add succeeds");
        self.events.drain();
        id
    }

    pub fn now(&self) -> Timestamp {
        self.registry.now()
    }
}
