use crate::errors::RegistryResult;
use crate::models::snapshot::RegistrySnapshot;

/// Durable home of the registry's record map and id sequence
pub trait SnapshotStore {
    /// Read the last persisted snapshot. An empty store yields the default snapshot.
    fn restore(&self) -> RegistryResult<RegistrySnapshot>;

    /// Persist `snapshot`, replacing whatever was stored before.
    ///
    /// On error the previously persisted snapshot must remain readable.
    fn persist(&mut self, snapshot: &RegistrySnapshot) -> RegistryResult<()>;
}
