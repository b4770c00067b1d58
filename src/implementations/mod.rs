pub mod clock;
pub mod config;
pub mod event_log;
pub mod registry;
pub mod store;
