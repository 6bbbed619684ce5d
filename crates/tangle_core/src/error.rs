//! Error types for tangle stores.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while opening or reading the stores.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] tangle_storage::StorageError),

    /// Trinary codec error.
    #[error("codec error: {0}")]
    Codec(#[from] tangle_codec::CodecError),

    /// The store directory or one of its files does not exist.
    #[error("store not found: {}", path.display())]
    StoreNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A record log is structurally damaged.
    #[error("{store} store corrupted: {message}")]
    StoreCorruption {
        /// Which store.
        store: &'static str,
        /// Description of the corruption.
        message: String,
    },

    /// A record failed its checksum.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Stored checksum.
        expected: u32,
        /// Computed checksum.
        actual: u32,
    },

    /// A record's value could not be decoded.
    #[error("invalid {kind} value: {message}")]
    InvalidValue {
        /// Kind of stored object.
        kind: &'static str,
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a store corruption error.
    pub fn store_corruption(store: &'static str, message: impl Into<String>) -> Self {
        Self::StoreCorruption {
            store,
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            message: message.into(),
        }
    }
}
