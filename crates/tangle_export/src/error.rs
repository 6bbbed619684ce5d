//! Error types for the exporter.

use crate::pipeline::PipelineState;
use crate::stats::RunStats;
use std::io;
use std::path::PathBuf;
use tangle_codec::CodecError;
use tangle_core::CoreError;
use thiserror::Error;

/// Result type for exporter operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Run-level errors. All of them stop the export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Missing or invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The stores could not be opened.
    #[error("cannot open tangle store: {0}")]
    Store(#[from] CoreError),

    /// The output file could not be opened.
    #[error("cannot open output file {}: {source}", path.display())]
    OpenOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The output could not be flushed after the run.
    #[error("output error: {0}")]
    Output(#[source] io::Error),

    /// Reading the metadata index failed mid-run.
    #[error("index traversal failed after {} entries: {source}", stats.total_seen)]
    Traversal {
        /// Underlying store error.
        source: CoreError,
        /// Counters at the point of failure.
        stats: RunStats,
    },

    /// The pipeline was driven from the wrong state.
    #[error("pipeline is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// Required state.
        expected: PipelineState,
        /// Current state.
        actual: PipelineState,
    },
}

/// Why a single index entry produced no row. Never fatal to the run.
#[derive(Debug, Error)]
pub enum ItemFailure {
    /// No transaction record for the hash.
    #[error("transaction not found")]
    TransactionNotFound,

    /// Reading the transaction record failed.
    #[error("cannot read transaction: {0}")]
    TransactionLookup(#[source] CoreError),

    /// The payload did not decode to trytes.
    #[error("cannot convert transaction to trytes: {0}")]
    Decode(#[source] CodecError),

    /// No metadata for the hash.
    #[error("transaction metadata not found")]
    MetadataNotFound,

    /// Reading the metadata failed.
    #[error("cannot read transaction metadata: {0}")]
    MetadataLookup(#[source] CoreError),

    /// The row could not be written.
    #[error("cannot write row")]
    Write,
}

impl ItemFailure {
    /// Short label for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransactionNotFound => "transaction_not_found",
            Self::TransactionLookup(_) => "transaction_lookup",
            Self::Decode(_) => "decode",
            Self::MetadataNotFound => "metadata_not_found",
            Self::MetadataLookup(_) => "metadata_lookup",
            Self::Write => "write",
        }
    }
}
