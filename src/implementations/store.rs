use std::fs::{ self, File, OpenOptions };
use std::io::{ ErrorKind, Write };
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex };

use fs2::FileExt;
use log::{ debug, warn };

use crate::errors::{ RegistryError, RegistryResult };
use crate::models::snapshot::RegistrySnapshot;
use crate::traits::snapshot_store::SnapshotStore;

/// Keeps the snapshot in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<RegistrySnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        MemoryStore {
            slot: Arc::new(Mutex::new(snapshot)),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn restore(&self) -> RegistryResult<RegistrySnapshot> {
        self.slot
            .lock()
            .map(|snapshot| snapshot.clone())
            .map_err(|_| RegistryError::LockPoisoned)
    }

    fn persist(&mut self, snapshot: &RegistrySnapshot) -> RegistryResult<()> {
        let mut slot = self.slot.lock().map_err(|_| RegistryError::LockPoisoned)?;
        *slot = snapshot.clone();
        Ok(())
    }
}

/// Stores the snapshot as pretty-printed JSON.
///
/// Writes go to a sibling temporary file that is flushed to disk and renamed
/// over the target, so a failed write leaves the previous snapshot intact.
/// The store holds an exclusive lock on `<file>.lock` for as long as it is
/// open, so only one process at a time can issue ids from the same file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: File,
}

impl JsonFileStore {
    /// Open the store at `path` and take the lock. Fails with
    /// [`RegistryError::StoreLocked`] while another handle holds it.
    pub fn open(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| storage_error(&path, e))?;
            }
        }

        let lock_path = sibling(&path, ".lock");
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| storage_error(&lock_path, e))?;

        if let Err(e) = lock.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                warn!("{} is locked by another process", path.display());
                return Err(RegistryError::StoreLocked(path));
            }
            return Err(storage_error(&lock_path, e));
        }

        debug!("Locked {}", lock_path.display());
        Ok(JsonFileStore { path, lock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            warn!("Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn storage_error(path: &Path, e: std::io::Error) -> RegistryError {
    RegistryError::Storage(format!("{}: {}", path.display(), e))
}

impl SnapshotStore for JsonFileStore {
    fn restore(&self) -> RegistryResult<RegistrySnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let snapshot: RegistrySnapshot = serde_json::from_str(&contents)?;
                debug!(
                    "Restored {} properties from {} (last issued id {})",
                    snapshot.properties.len(),
                    self.path.display(),
                    snapshot.last_issued_id
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", self.path.display());
                Ok(RegistrySnapshot::default())
            }
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn persist(&mut self, snapshot: &RegistrySnapshot) -> RegistryResult<()> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        let temp = sibling(&self.path, ".tmp");
        {
            let mut file = File::create(&temp).map_err(|e| storage_error(&temp, e))?;
            file.write_all(contents.as_bytes()).map_err(|e| storage_error(&temp, e))?;
            file.sync_all().map_err(|e| storage_error(&temp, e))?;
        }
        fs::rename(&temp, &self.path).map_err(|e| storage_error(&self.path, e))?;
        debug!("Persisted {} properties to {}", snapshot.properties.len(), self.path.display());
        Ok(())
    }
}
