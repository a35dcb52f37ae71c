// src/events/mock.rs

use std::sync::Mutex;

use crate::errors::{Result, SeedrunError};
use crate::events::{Event, EventSink};
use crate::types::EventLevel;

/// Sink that records every event in memory, for tests.
///
/// A sink built with [`MemorySink::failing`] rejects every emission, which is
/// how reporting failures are exercised.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(EventLevel, Event)>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<(EventLevel, Event)> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Rendered events, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, e)| e.to_string()).collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, level: EventLevel, event: &Event) -> Result<()> {
        if self.fail {
            return Err(SeedrunError::Reporting("sink rejected event".to_string()));
        }
        self.events
            .lock()
            .map_err(|_| SeedrunError::Reporting("memory sink lock poisoned".to_string()))?
            .push((level, event.clone()));
        Ok(())
    }
}
