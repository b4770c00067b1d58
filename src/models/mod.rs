pub mod common;
pub mod property;
pub mod will;
pub mod event;
pub mod snapshot;

// Re-export common model types
pub use common::{ OutputFormat, PrincipalId, PropertyId, Timestamp, SECONDS_PER_DAY };
pub use property::{ ExpiryStanding, NewProperty, Property, PropertyDetails, Standing };
pub use will::WillOwners;
pub use event::RegistryEvent;
pub use snapshot::RegistrySnapshot;
