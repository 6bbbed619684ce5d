//! # Tangle Export
//!
//! Batch export of a local tangle to a JSON text file.
//!
//! Every hash in the metadata index is joined with its transaction record and
//! written as one indented JSON object. Entries that cannot be exported are
//! logged and counted in [`RunStats`]; they never stop the run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tangle_export::{export, ExportConfig, OpenMode};
//!
//! let config = ExportConfig::new("mainnetdb")
//!     .output("export.txt")
//!     .mode(OpenMode::Truncate);
//! let stats = export(&config)?;
//! println!("{stats}");
//! # Ok::<(), tangle_export::ExportError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod inspect;
mod pipeline;
mod row;
mod sink;
mod stats;

pub use config::{ExportConfig, DEFAULT_OUTPUT};
pub use error::{ExportError, ExportResult, ItemFailure};
pub use inspect::{InspectReport, StoreSummary};
pub use pipeline::{ExportPipeline, PipelineState};
pub use row::{build_row, ExportRow};
pub use sink::{OpenMode, Rollback, Sink};
pub use stats::RunStats;

use tangle_core::Tangle;

/// Runs one export as configured.
///
/// The stores are opened before the output file, so a store that cannot be
/// opened leaves the output untouched.
///
/// # Errors
///
/// - [`ExportError::Config`] for an invalid configuration
/// - [`ExportError::Store`] if the stores cannot be opened
/// - [`ExportError::OpenOutput`] if the output file cannot be opened
/// - [`ExportError::Traversal`] if the metadata index cannot be read mid-run
/// - [`ExportError::Output`] if the output cannot be flushed
pub fn export(config: &ExportConfig) -> ExportResult<RunStats> {
    config.validate()?;

    let tangle = Tangle::open(&config.db_path, &config.store)?;
    match tangle.transaction_storage_size() {
        Ok(size) => tracing::info!(size, "transaction storage size"),
        Err(e) => tracing::warn!(error = %e, "cannot read transaction storage size"),
    }

    let sink = Sink::open(&config.output, config.mode).map_err(|source| ExportError::OpenOutput {
        path: config.output.clone(),
        source,
    })?;

    tracing::info!(
        db_path = %config.db_path.display(),
        output = %config.output.display(),
        entries = tangle.metadata_store().len(),
        "starting export"
    );

    let mut pipeline = ExportPipeline::new(&tangle, sink).with_limit(config.limit);
    let stats = pipeline.run()?;
    pipeline.into_sink().finish().map_err(ExportError::Output)?;

    let outstanding = tangle.outstanding_handles();
    if outstanding != 0 {
        tracing::warn!(outstanding, "handles still held after export");
    }

    Ok(stats)
}
