//! Output sink for export rows.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

/// How the output file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Keep existing content and append after it.
    #[default]
    Append,
    /// Discard existing content first.
    Truncate,
}

/// Appends rows to an output stream as indented JSON objects, one per row,
/// each followed by a newline.
///
/// A row is serialized in full before anything is written, so a
/// serialization failure never leaves a partial object in the output. A
/// write that fails part-way is cut back to the end of the previous row when
/// the sink has a rollback (file sinks always do); without one the fragment
/// stays in the stream.
///
/// Failures are counted and returned to the caller, which logs them.
pub struct Sink<W: Write> {
    writer: W,
    offset: u64,
    rollback: Option<Rollback<W>>,
    rows_written: u64,
    bytes_written: u64,
    failures: u64,
}

/// Cuts a stream back to the given length.
pub type Rollback<W> = fn(&mut W, u64) -> io::Result<()>;

fn truncate_file(file: &mut File, len: u64) -> io::Result<()> {
    file.set_len(len)?;
    file.seek(SeekFrom::Start(len))?;
    Ok(())
}

impl<W: Write + fmt::Debug> fmt::Debug for Sink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("writer", &self.writer)
            .field("offset", &self.offset)
            .field("rows_written", &self.rows_written)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

impl Sink<File> {
    /// Opens (creating if needed) the output file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened or created.
    pub fn open(path: &Path, mode: OpenMode) -> io::Result<Self> {
        let file = match mode {
            OpenMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
            OpenMode::Truncate => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
        };
        let offset = file.metadata()?.len();
        Ok(Self::with_rollback(file, offset, truncate_file))
    }
}

impl<W: Write> Sink<W> {
    /// Wraps an already opened stream.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            offset: 0,
            rollback: None,
            rows_written: 0,
            bytes_written: 0,
            failures: 0,
        }
    }

    /// Wraps a stream that currently holds `offset` bytes and can be cut back
    /// with `rollback` after a partial write.
    pub fn with_rollback(writer: W, offset: u64, rollback: Rollback<W>) -> Self {
        Self {
            offset,
            rollback: Some(rollback),
            ..Self::new(writer)
        }
    }

    /// Serializes `row` and appends it. Returns whether the row was written.
    pub fn write<T: Serialize + ?Sized>(&mut self, row: &T) -> bool {
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        if let Err(e) = row.serialize(&mut serializer) {
            tracing::debug!(error = %e, "cannot serialize row");
            self.failures += 1;
            return false;
        }
        buf.push(b'\n');

        if let Err(e) = self.writer.write_all(&buf) {
            tracing::debug!(error = %e, "cannot write row to output");
            self.failures += 1;
            if let Some(rollback) = self.rollback {
                if let Err(e) = rollback(&mut self.writer, self.offset) {
                    tracing::error!(error = %e, offset = self.offset, "cannot remove partial row from output");
                }
            }
            return false;
        }

        self.offset += buf.len() as u64;
        self.rows_written += 1;
        self.bytes_written += buf.len() as u64;
        true
    }

    /// Rows written so far.
    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Rows that failed to serialize or write.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Flushes the stream and returns it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the flush fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
