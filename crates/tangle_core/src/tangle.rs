//! The tangle store directory.
//!
//! ```text
//! <db_path>/
//! ├─ transactions.dat   # transaction records keyed by hash
//! └─ metadata.dat       # transaction metadata keyed by hash
//! ```
//!
//! Both files are opened read-only and never created. With
//! [`StoreConfig::lock_files`] set, each is held under a shared lock so a
//! writer cannot take it over mid-run.

use crate::cached::CachedObject;
use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::object::{Transaction, TransactionMetadata};
use crate::stats::HandleStatsSnapshot;
use crate::store::{KeyIterator, ObjectStore};
use std::path::{Path, PathBuf};
use tangle_codec::Hash;
use tangle_storage::{FileBackend, StorageBackend};

/// File holding transaction records.
pub const TRANSACTIONS_FILE: &str = "transactions.dat";
/// File holding transaction metadata.
pub const METADATA_FILE: &str = "metadata.dat";

/// Returns the transaction log path inside a store directory.
#[must_use]
pub fn transactions_path(dir: &Path) -> PathBuf {
    dir.join(TRANSACTIONS_FILE)
}

/// Returns the metadata log path inside a store directory.
#[must_use]
pub fn metadata_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_FILE)
}

/// Read-only view of a local tangle: the record store and the metadata store.
#[derive(Debug)]
pub struct Tangle {
    path: Option<PathBuf>,
    transactions: ObjectStore<Transaction>,
    metadata: ObjectStore<TransactionMetadata>,
}

impl Tangle {
    /// Opens the store directory at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::StoreNotFound`] if the directory or a store file is missing
    /// - a storage error if a file is locked by a writer or cannot be read
    /// - [`CoreError::StoreCorruption`] if a log header is impossible
    pub fn open(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        if !path.is_dir() {
            return Err(CoreError::StoreNotFound {
                path: path.to_path_buf(),
            });
        }

        let open_file = |file: PathBuf| -> CoreResult<Box<dyn StorageBackend>> {
            if !file.is_file() {
                return Err(CoreError::StoreNotFound { path: file });
            }
            Ok(Box::new(FileBackend::open_read_only(&file, config.lock_files)?))
        };

        let transactions = open_file(transactions_path(path))?;
        let metadata = open_file(metadata_path(path))?;

        let mut tangle = Self::from_backends(transactions, metadata, config)?;
        tangle.path = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            transactions = tangle.transactions.len(),
            metadata = tangle.metadata.len(),
            "tangle opened"
        );

        Ok(tangle)
    }

    /// Opens the stores over arbitrary backends.
    ///
    /// # Errors
    ///
    /// Fails if either log cannot be indexed.
    pub fn from_backends(
        transactions: Box<dyn StorageBackend>,
        metadata: Box<dyn StorageBackend>,
        config: &StoreConfig,
    ) -> CoreResult<Self> {
        Ok(Self {
            path: None,
            transactions: ObjectStore::open("transactions", transactions, config.clone())?,
            metadata: ObjectStore::open("metadata", metadata, config.clone())?,
        })
    }

    /// Directory the tangle was opened from, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Looks up a transaction record.
    ///
    /// # Errors
    ///
    /// See [`ObjectStore::get`].
    pub fn transaction(&self, hash: &Hash) -> CoreResult<Option<CachedObject<Transaction>>> {
        self.transactions.get(hash)
    }

    /// Looks up transaction metadata.
    ///
    /// # Errors
    ///
    /// See [`ObjectStore::get`].
    pub fn metadata(&self, hash: &Hash) -> CoreResult<Option<CachedObject<TransactionMetadata>>> {
        self.metadata.get(hash)
    }

    /// Streams every hash in the metadata index.
    #[must_use]
    pub fn metadata_hashes(&self) -> KeyIterator<'_> {
        self.metadata.keys()
    }

    /// The record store.
    #[must_use]
    pub fn transactions(&self) -> &ObjectStore<Transaction> {
        &self.transactions
    }

    /// The metadata store.
    #[must_use]
    pub fn metadata_store(&self) -> &ObjectStore<TransactionMetadata> {
        &self.metadata
    }

    /// Size of the transaction log in bytes.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot report its size.
    pub fn transaction_storage_size(&self) -> CoreResult<u64> {
        self.transactions.storage_size()
    }

    /// Combined lookup and handle counters of both stores.
    #[must_use]
    pub fn handle_stats(&self) -> HandleStatsSnapshot {
        self.transactions.handle_stats().snapshot() + self.metadata.handle_stats().snapshot()
    }

    /// Handles acquired from either store and not yet released.
    #[must_use]
    pub fn outstanding_handles(&self) -> u64 {
        self.transactions.handle_stats().outstanding() + self.metadata.handle_stats().outstanding()
    }
}
