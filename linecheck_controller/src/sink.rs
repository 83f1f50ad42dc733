//! Append-only output record sinks.
//!
//! A sink receives every stamped `OutputRecord`. Sinks can be disabled
//! (writes become no-ops) and cleared (truncated). Neither operation has
//! any effect on the controller. I/O failures are returned as `SinkError`
//! and downgraded to diagnostics by the runner.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use linecheck_common::consts::LOG_FILE_PREFIX;
use linecheck_common::station::record::OutputRecord;
use thiserror::Error;

/// Record sink failure.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("record log I/O on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence collaborator for output records.
pub trait RecordSink {
    /// Append one record. A disabled sink accepts and drops it.
    fn write(&mut self, record: &OutputRecord) -> Result<(), SinkError>;

    /// Drop everything written so far.
    fn clear(&mut self) -> Result<(), SinkError>;

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        (**self).write(record)
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        (**self).clear()
    }

    fn set_enabled(&mut self, enabled: bool) {
        (**self).set_enabled(enabled)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

// ─── JSON Lines File ────────────────────────────────────────────────

/// One JSON object per line in `<dir>/linecheck_<run_id>.jsonl`.
///
/// The directory and file are created on the first enabled write.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    enabled: bool,
}

impl JsonlSink {
    /// Sink for `run_id` under `dir`. Nothing is touched on disk yet.
    pub fn new(dir: &Path, run_id: &str, enabled: bool) -> Self {
        Self {
            path: dir.join(format!("{LOG_FILE_PREFIX}_{run_id}.jsonl")),
            writer: None,
            enabled,
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn open(&self) -> Result<File, SinkError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, SinkError> {
        match self.writer {
            Some(ref mut writer) => Ok(writer),
            None => {
                let file = self.open()?;
                Ok(self.writer.insert(BufWriter::new(file)))
            }
        }
    }
}

impl RecordSink for JsonlSink {
    fn write(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        if !self.enabled {
            return Ok(());
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let path = self.path.clone();
        let writer = self.writer()?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| SinkError::Io { path, source })
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.writer = None;
        if !self.path.exists() {
            return Ok(());
        }
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map(drop)
            .map_err(|e| self.io_error(e))
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ─── In-Memory ──────────────────────────────────────────────────────

/// Keeps records in a `Vec`. Used by tests and embedders.
#[derive(Debug, Clone)]
pub struct MemorySink {
    records: Vec<OutputRecord>,
    enabled: bool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            enabled: true,
        }
    }
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        if self.enabled {
            self.records.push(record.clone());
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.records.clear();
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
