use std::fs::{ self, File, OpenOptions };
use std::io::{ BufRead, BufReader, Write };
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex };

use log::{ info, warn };

use crate::errors::{ RegistryError, RegistryResult };
use crate::models::event::RegistryEvent;
use crate::traits::event_sink::EventSink;

/// Keeps every published event in memory. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<RegistryEvent>>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<RegistryEvent> {
        self.events().last().cloned()
    }

    /// Returns the buffered events and empties the buffer
    pub fn drain(&self) -> Vec<RegistryEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventSink for MemoryEventSink {
    fn publish(&self, event: &RegistryEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Writes each event to the `log` facade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn publish(&self, event: &RegistryEvent) {
        info!(target: "estate::events", "{}", event);
    }
}

/// Appends events as JSON lines to a journal file
#[derive(Debug, Clone)]
pub struct JsonLinesEventSink {
    path: PathBuf,
}

impl JsonLinesEventSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesEventSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &RegistryEvent) -> RegistryResult<()> {
        let line = serde_json::to_string(event)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RegistryError::Storage(e.to_string()))?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RegistryError::Storage(format!("{}: {}", self.path.display(), e)))?;
        writeln!(file, "{}", line).map_err(|e| RegistryError::Storage(e.to_string()))
    }

    /// Reads every event back from the journal. A missing file is an empty journal.
    pub fn read_all(&self) -> RegistryResult<Vec<RegistryEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path).map_err(|e|
            RegistryError::Storage(format!("{}: {}", self.path.display(), e))
        )?;
        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| RegistryError::Storage(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }
}

impl EventSink for JsonLinesEventSink {
    fn publish(&self, event: &RegistryEvent) {
        if let Err(e) = self.append(event) {
            warn!("Failed to append {} to {}: {}", event.kind(), self.path.display(), e);
        }
    }
}
