//! Export run configuration.

use crate::error::{ExportError, ExportResult};
use crate::sink::OpenMode;
use std::path::PathBuf;
use tangle_core::StoreConfig;

/// Output file used when none is given.
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Everything one export run needs, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Store directory.
    pub db_path: PathBuf,
    /// Output file.
    pub output: PathBuf,
    /// How the output file is opened.
    pub mode: OpenMode,
    /// Stop after this many index entries.
    pub limit: Option<u64>,
    /// Store options.
    pub store: StoreConfig,
}

impl ExportConfig {
    /// Creates a configuration with default output, append mode and no limit.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            mode: OpenMode::default(),
            limit: None,
            store: StoreConfig::new(),
        }
    }

    /// Sets the output file.
    #[must_use]
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the output open mode.
    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the entry limit.
    #[must_use]
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the store options.
    #[must_use]
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Checks the configuration before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] if the store path or output path is empty.
    pub fn validate(&self) -> ExportResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ExportError::Config("database path is empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ExportError::Config("output path is empty".into()));
        }
        Ok(())
    }
}
