pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
pub mod cli;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ RegistryOptions, DEFAULT_AUTO_TRANSFER_DAYS };
pub use errors::{ ErrorSeverity, RecoverableError, RegistryError, RegistryResult };
pub use implementations::clock::{ ManualClock, SystemClock };
pub use implementations::config::{ ConfigError, EstateConfig };
pub use implementations::event_log::{ JsonLinesEventSink, LogEventSink, MemoryEventSink };
pub use implementations::registry::PropertyRegistry;
pub use implementations::store::{ JsonFileStore, MemoryStore };
pub use models::{
    common::{ PrincipalId, PropertyId, Timestamp, SECONDS_PER_DAY },
    property::{ ExpiryStanding, NewProperty, Property, PropertyDetails, Standing },
    will::WillOwners,
    event::RegistryEvent,
    snapshot::RegistrySnapshot,
};
pub use traits::{ Clock, EventSink, SnapshotStore };
