//! Durable event storage.
//!
//! The store is read once when a [`Calendar`](crate::Calendar) opens and
//! written after every mutation. Writes are last-write-wins; there is no
//! schema versioning.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScheduleError};
use crate::event::Event;

/// Where the event collection lives between sessions.
pub trait EventStore {
    fn load(&self) -> Result<Vec<Event>>;

    fn save(&mut self, events: &[Event]) -> Result<()>;
}

/// A JSON array of events in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "events.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl EventStore for JsonFileStore {
    /// A missing file is an empty calendar.
    fn load(&self) -> Result<Vec<Event>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "event_store_missing_starting_empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let events: Vec<Event> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), count = events.len(), "event_store_loaded");
        Ok(events)
    }

    fn save(&mut self, events: &[Event]) -> Result<()> {
        let json = serde_json::to_string_pretty(events)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = events.len(), "event_store_saved");
        Ok(())
    }
}

/// Reject a loaded collection with a blank title or a repeated id.
///
/// # Errors
///
/// Returns [`ScheduleError::Store`] naming the first offending event.
pub fn check_collection(events: &[Event]) -> Result<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        if event.title.trim().is_empty() {
            return Err(ScheduleError::Store(format!("event '{}' has no title", event.id)));
        }
        if !seen.insert(&event.id) {
            let message = format!("event id '{}' appears more than once", event.id);
            return Err(ScheduleError::Store(message));
        }
    }
    Ok(())
}

/// In-process store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<Event>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// A store whose every `save` fails.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// The collection as last saved.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// How many successful saves have happened.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn save(&mut self, events: &[Event]) -> Result<()> {
        if self.fail_saves {
            return Err(ScheduleError::Store(
                "memory store is read-only".to_string(),
            ));
        }
        self.events = events.to_vec();
        self.saves += 1;
        Ok(())
    }
}
