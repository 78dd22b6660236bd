//! Retained-content output.
//!
//! The orchestrator hands each retained body to an `OutputSink`; where it
//! lands (a flat file here, anywhere else behind the trait) is not the
//! pipeline's concern.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::SinkError;

/// Destination for retained, cleaned message bodies.
pub trait OutputSink: Send {
    /// Append one entry. Returns the running entry count.
    fn write_entry(&mut self, content: &str) -> Result<usize, SinkError>;

    /// Flush and close the sink. Further writes fail with `NotOpen`.
    fn finalize(&mut self) -> Result<(), SinkError>;

    /// Entries written so far.
    fn count(&self) -> usize;
}

/// Flat text file of `=== EMAIL <n> ===`-delimited entries.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    count: usize,
}

impl FileSink {
    /// Create (truncating) the output file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            count: 0,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write_entry(&mut self, content: &str) -> Result<usize, SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::NotOpen)?;
        self.count += 1;
        writeln!(writer, "=== EMAIL {} ===", self.count)?;
        writeln!(writer, "{content}")?;
        writeln!(writer)?;
        Ok(self.count)
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            info!(path = %self.path.display(), entries = self.count, "output finalized");
        }
        Ok(())
    }

    fn count(&self) -> usize {
        self.count
    }
}
