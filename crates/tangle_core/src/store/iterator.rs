//! Streaming key iterator.

use super::{read_header, HeaderRead, RecordLocation};
use crate::error::CoreResult;
use std::collections::HashMap;
use tangle_codec::Hash;
use tangle_storage::StorageBackend;

/// Streams the live keys of a store in log order.
///
/// Headers are read one at a time from the backend. A key is yielded only at
/// the offset the store index maps it to, so superseded versions and deleted
/// keys are skipped and no key is yielded twice. Breaking out of the loop
/// stops the traversal.
///
/// After an error the iterator is exhausted.
pub struct KeyIterator<'a> {
    store: &'static str,
    backend: &'a dyn StorageBackend,
    index: &'a HashMap<Hash, RecordLocation>,
    offset: u64,
    size: Option<u64>,
    done: bool,
}

impl<'a> KeyIterator<'a> {
    pub(crate) fn new(
        store: &'static str,
        backend: &'a dyn StorageBackend,
        index: &'a HashMap<Hash, RecordLocation>,
    ) -> Self {
        Self {
            store,
            backend,
            index,
            offset: 0,
            size: None,
            done: false,
        }
    }

    fn next_key(&mut self) -> CoreResult<Option<Hash>> {
        let size = match self.size {
            Some(size) => size,
            None => {
                let size = self.backend.size()?;
                self.size = Some(size);
                size
            }
        };

        loop {
            let header = match read_header(self.store, self.backend, self.offset, size)? {
                HeaderRead::Record(header) => header,
                HeaderRead::End => return Ok(None),
            };
            let offset = self.offset;
            self.offset += u64::from(header.record_len);

            let Ok(key) = Hash::from_bytes(&header.key) else {
                continue;
            };
            if self.index.get(&key).map(|location| location.offset) == Some(offset) {
                return Ok(Some(key));
            }
        }
    }
}

impl Iterator for KeyIterator<'_> {
    type Item = CoreResult<Hash>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_key() {
            Ok(Some(key)) => Some(Ok(key)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::StoreConfig;
    use crate::object::{StoredObject, TransactionMetadata};
    use crate::record::StoreRecord;
    use crate::store::ObjectStore;
    use tangle_codec::Hash;
    use tangle_storage::InMemoryBackend;

    fn hash(prefix: &str) -> Hash {
        Hash::from_trytes(&format!("{prefix}{}", "9".repeat(81 - prefix.len()))).unwrap()
    }

    fn put(name: &str) -> StoreRecord {
        let meta = TransactionMetadata::new(hash(name), Hash::NULL, Hash::NULL, Hash::NULL);
        StoreRecord::put(meta.hash(), meta.to_value())
    }

    fn store(records: &[StoreRecord]) -> ObjectStore<TransactionMetadata> {
        let data = records.iter().flat_map(StoreRecord::encode).collect();
        ObjectStore::open(
            "metadata",
            Box::new(InMemoryBackend::with_data(data)),
            StoreConfig::new(),
        )
        .unwrap()
    }

    fn keys(store: &ObjectStore<TransactionMetadata>) -> Vec<Hash> {
        store.keys().collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn yields_keys_in_log_order() {
        let store = store(&[put("C"), put("A"), put("B")]);
        assert_eq!(keys(&store), vec![hash("C"), hash("A"), hash("B")]);
    }

    #[test]
    fn superseded_key_yielded_once_at_newest_position() {
        let store = store(&[put("A"), put("B"), put("A")]);
        assert_eq!(keys(&store), vec![hash("B"), hash("A")]);
    }

    #[test]
    fn deleted_key_not_yielded() {
        let store = store(&[
            put("A"),
            put("B"),
            StoreRecord::tombstone(hash("A")),
            put("C"),
        ]);
        assert_eq!(keys(&store), vec![hash("B"), hash("C")]);
    }

    #[test]
    fn reinserted_after_delete_yielded_once() {
        let store = store(&[put("A"), StoreRecord::tombstone(hash("A")), put("A")]);
        assert_eq!(keys(&store), vec![hash("A")]);
    }

    #[test]
    fn consumer_can_stop_early() {
        let store = store(&[put("A"), put("B"), put("C")]);
        let mut seen = Vec::new();
        for key in store.keys() {
            let key = key.unwrap();
            seen.push(key);
            if key == hash("B") {
                break;
            }
        }
        assert_eq!(seen, vec![hash("A"), hash("B")]);
    }

    #[test]
    fn traversal_is_restartable() {
        let store = store(&[put("A"), put("B")]);
        assert_eq!(keys(&store), keys(&store));
    }
}
