//! Keyed object stores over a record log.
//!
//! Opening a store scans record headers once and keeps an in-memory index
//! from key to the newest record for that key. Later records supersede
//! earlier ones; tombstones remove the key. Values are read back from the
//! backend on every lookup, so memory stays proportional to the key count.

mod iterator;

pub use iterator::KeyIterator;

use crate::cached::CachedObject;
use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::object::StoredObject;
use crate::record::{RecordHeader, StoreRecord};
use crate::stats::HandleStats;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tangle_codec::Hash;
use tangle_storage::StorageBackend;

/// Position of a record in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordLocation {
    pub(crate) offset: u64,
    pub(crate) len: u32,
}

/// What a header read at some offset produced.
pub(crate) enum HeaderRead {
    /// A complete record starts here.
    Record(RecordHeader),
    /// The log ends here, cleanly or with a truncated record.
    End,
}

/// Reads the header at `offset`, treating a truncated tail as the end of the log.
pub(crate) fn read_header(
    store: &'static str,
    backend: &dyn StorageBackend,
    offset: u64,
    size: u64,
) -> CoreResult<HeaderRead> {
    let remaining = size.saturating_sub(offset);
    if remaining == 0 {
        return Ok(HeaderRead::End);
    }
    if remaining < StoreRecord::HEADER_SIZE as u64 {
        tracing::warn!(store, offset, remaining, "truncated record header at end of log");
        return Ok(HeaderRead::End);
    }

    let data = backend.read_at(offset, StoreRecord::HEADER_SIZE)?;
    let header = RecordHeader::parse(store, &data)?;

    if u64::from(header.record_len) > remaining {
        tracing::warn!(
            store,
            offset,
            record_len = header.record_len,
            remaining,
            "truncated record at end of log"
        );
        return Ok(HeaderRead::End);
    }

    Ok(HeaderRead::Record(header))
}

/// A read-only keyed store of `T`.
///
/// # Example
///
/// ```rust
/// use tangle_core::{ObjectStore, StoreConfig, StoreRecord, StoredObject, Transaction};
/// use tangle_codec::Hash;
/// use tangle_storage::InMemoryBackend;
///
/// let hash = Hash::from_trytes(&"A".repeat(81)).unwrap();
/// let tx = Transaction::new(hash, vec![0; 1604]);
/// let log = StoreRecord::put(hash, tx.to_value()).encode();
///
/// let store: ObjectStore<Transaction> =
///     ObjectStore::open("transactions", Box::new(InMemoryBackend::with_data(log)), StoreConfig::new())
///         .unwrap();
/// let handle = store.get(&hash).unwrap().unwrap();
/// assert_eq!(handle.raw().len(), 1604);
/// ```
pub struct ObjectStore<T> {
    name: &'static str,
    backend: Box<dyn StorageBackend>,
    index: HashMap<Hash, RecordLocation>,
    stats: Arc<HandleStats>,
    config: StoreConfig,
    skipped: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StoredObject> ObjectStore<T> {
    /// Opens a store over `backend`, building its key index.
    ///
    /// Records whose key is not a valid hash are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or a record header that cannot be valid.
    pub fn open(
        name: &'static str,
        backend: Box<dyn StorageBackend>,
        config: StoreConfig,
    ) -> CoreResult<Self> {
        let size = backend.size()?;
        let mut index = HashMap::new();
        let mut skipped = 0;
        let mut offset = 0u64;

        while let HeaderRead::Record(header) = read_header(name, backend.as_ref(), offset, size)? {
            match Hash::from_bytes(&header.key) {
                Ok(key) if header.flags.is_tombstone() => {
                    index.remove(&key);
                }
                Ok(key) => {
                    index.insert(
                        key,
                        RecordLocation {
                            offset,
                            len: header.record_len,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(store = name, offset, error = %e, "skipping record with invalid key");
                    skipped += 1;
                }
            }
            offset += u64::from(header.record_len);
        }

        tracing::debug!(store = name, entries = index.len(), size, "store opened");

        Ok(Self {
            name,
            backend,
            index,
            stats: Arc::new(HandleStats::new()),
            config,
            skipped,
            _marker: PhantomData,
        })
    }

    /// Looks up the object stored under `hash`.
    ///
    /// Returns `Ok(None)` when the key is absent. The returned handle must
    /// be dropped (or [`released`](CachedObject::release)) once the caller
    /// is done with it.
    ///
    /// # Errors
    ///
    /// Fails if the record cannot be read, fails its checksum, or does not
    /// decode to a `T`.
    pub fn get(&self, hash: &Hash) -> CoreResult<Option<CachedObject<T>>> {
        self.stats.record_lookup();

        let Some(location) = self.index.get(hash) else {
            self.stats.record_miss();
            return Ok(None);
        };

        match self.read_object(hash, *location) {
            Ok(object) => Ok(Some(CachedObject::acquire(
                Arc::new(object),
                Arc::clone(&self.stats),
            ))),
            Err(e) => {
                self.stats.record_read_error();
                Err(e)
            }
        }
    }

    fn read_object(&self, hash: &Hash, location: RecordLocation) -> CoreResult<T> {
        let data = self.backend.read_at(location.offset, location.len as usize)?;
        let record = StoreRecord::decode(self.name, &data, self.config.verify_checksums)?;

        if record.key != *hash {
            return Err(CoreError::store_corruption(
                self.name,
                format!("record at offset {} holds a different key", location.offset),
            ));
        }

        T::from_value(*hash, &record.value)
    }

    /// Whether the store holds `hash`.
    #[must_use]
    pub fn contains(&self, hash: &Hash) -> bool {
        self.index.contains_key(hash)
    }

    /// Streams every live key in log order.
    #[must_use]
    pub fn keys(&self) -> KeyIterator<'_> {
        KeyIterator::new(self.name, self.backend.as_ref(), &self.index)
    }
}

impl<T> ObjectStore<T> {
    /// Store name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Records skipped at open because their key was invalid.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Size of the underlying log in bytes.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot report its size.
    pub fn storage_size(&self) -> CoreResult<u64> {
        Ok(self.backend.size()?)
    }

    /// Lookup and handle counters.
    #[must_use]
    pub fn handle_stats(&self) -> &HandleStats {
        &self.stats
    }
}

impl<T> std::fmt::Debug for ObjectStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("name", &self.name)
            .field("entries", &self.index.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
