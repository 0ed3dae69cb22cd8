//! JSONL Loggers
//!
//! Append-only JSONL streams of tick snapshots and cascade events.

use opinion_events::{CascadeEvent, TickSnapshot};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;
use tracing::warn;

use crate::error::OutputError;

/// Snapshot stream file name inside the output directory
pub const SNAPSHOTS_FILE_NAME: &str = "snapshots.jsonl";
/// Event stream file name inside the output directory
pub const EVENTS_FILE_NAME: &str = "events.jsonl";

/// Writes one JSON record per line.
pub struct JsonlLogger<T> {
    writer: Option<BufWriter<File>>,
    record_count: u64,
    _record: PhantomData<fn(&T)>,
}

/// Per-tick snapshot stream for renderers
pub type SnapshotLogger = JsonlLogger<TickSnapshot>;
/// Cascade event stream
pub type EventLogger = JsonlLogger<CascadeEvent>;

impl<T: Serialize> JsonlLogger<T> {
    /// Create a logger writing to `path`, truncating any previous content
    pub fn new(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
            _record: PhantomData,
        })
    }

    /// Create a logger that discards records
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
            _record: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        self.writer.is_none()
    }

    /// Records passed to `log`, including discarded ones
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    pub fn log(&mut self, record: &T) -> Result<(), OutputError> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, records: &[T]) -> Result<(), OutputError> {
        for record in records {
            self.log(record)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl<T> Drop for JsonlLogger<T> {
    fn drop(&mut self) {
        if let Some(ref mut writer) = self.writer {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "failed to flush JSONL logger");
            }
        }
    }
}
