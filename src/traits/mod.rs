pub mod clock;
pub mod event_sink;
pub mod snapshot_store;

// Re-export traits
pub use clock::Clock;
pub use event_sink::EventSink;
pub use snapshot_store::SnapshotStore;
