// src/events/console.rs

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use tracing::debug;

use crate::errors::{Result, SeedrunError};
use crate::events::{Event, EventSink};
use crate::types::EventLevel;

/// Writes one rendered line per event to a writer (stdout by default).
///
/// Writes are serialized through a mutex so lines from concurrent workers
/// never interleave.
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    min_level: EventLevel,
}

impl ConsoleSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            min_level: EventLevel::Info,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, level: EventLevel, event: &Event) -> Result<()> {
        debug!(?level, ?event, "event");

        if level < self.min_level {
            return Ok(());
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SeedrunError::Reporting("console writer lock poisoned".to_string()))?;
        writeln!(writer, "{event}")
            .and_then(|_| writer.flush())
            .map_err(|e| SeedrunError::Reporting(e.to_string()))
    }
}
