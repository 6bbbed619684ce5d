//! Test fixtures and store helpers.
//!
//! Provides a store directory that tests populate record by record, and
//! deterministic hashes and payloads to populate it with.

use std::path::Path;
use tangle_codec::{encode_transaction, Hash, HASH_TRYTES, TRANSACTION_BYTES, TRANSACTION_TRYTES};
use tangle_core::{
    metadata_path, transactions_path, StoreConfig, StoreRecord, StoredObject, Tangle,
    TransactionMetadata,
};
use tangle_storage::{FileBackend, StorageBackend};
use tempfile::TempDir;

/// A store directory in a temporary folder, removed on drop.
///
/// Both store files exist from the start, so an empty fixture opens as an
/// empty tangle.
pub struct TestTangle {
    transactions: FileBackend,
    metadata: FileBackend,
    dir: TempDir,
}

impl TestTangle {
    /// Creates an empty store directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let transactions = FileBackend::open_with_create_dirs(&transactions_path(dir.path()))
            .expect("Failed to create transaction log");
        let metadata = FileBackend::open_with_create_dirs(&metadata_path(dir.path()))
            .expect("Failed to create metadata log");

        Self {
            transactions,
            metadata,
            dir,
        }
    }

    /// Returns the store directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Appends a transaction record from its trytes.
    pub fn add_transaction(&mut self, hash: Hash, trytes: &str) -> &mut Self {
        let raw = encode_transaction(trytes).expect("Invalid transaction trytes");
        self.add_raw_transaction(hash, raw)
    }

    /// Appends a transaction record with an arbitrary payload.
    pub fn add_raw_transaction(&mut self, hash: Hash, raw: Vec<u8>) -> &mut Self {
        append(&mut self.transactions, &StoreRecord::put(hash, raw).encode());
        self
    }

    /// Appends a metadata record.
    pub fn add_metadata(&mut self, meta: &TransactionMetadata) -> &mut Self {
        append(
            &mut self.metadata,
            &StoreRecord::put(meta.hash(), meta.to_value()).encode(),
        );
        self
    }

    /// Appends both the transaction record and its metadata.
    pub fn add_entry(&mut self, meta: &TransactionMetadata, trytes: &str) -> &mut Self {
        self.add_transaction(meta.hash(), trytes).add_metadata(meta)
    }

    /// Appends a transaction record whose stored checksum does not match.
    pub fn add_corrupt_transaction(&mut self, hash: Hash, trytes: &str) -> &mut Self {
        let raw = encode_transaction(trytes).expect("Invalid transaction trytes");
        let mut encoded = StoreRecord::put(hash, raw).encode();
        encoded[StoreRecord::HEADER_SIZE] ^= 0x01;
        append(&mut self.transactions, &encoded);
        self
    }

    /// Appends a tombstone for a transaction record.
    pub fn delete_transaction(&mut self, hash: Hash) -> &mut Self {
        append(&mut self.transactions, &StoreRecord::tombstone(hash).encode());
        self
    }

    /// Appends a tombstone for a metadata record.
    pub fn delete_metadata(&mut self, hash: Hash) -> &mut Self {
        append(&mut self.metadata, &StoreRecord::tombstone(hash).encode());
        self
    }

    /// Appends raw bytes to the metadata log, e.g. a torn record.
    pub fn append_metadata_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        append(&mut self.metadata, bytes);
        self
    }

    /// Opens the directory with default store options.
    pub fn open(&mut self) -> Tangle {
        self.open_with(&StoreConfig::new())
    }

    /// Opens the directory with the given store options.
    pub fn open_with(&mut self, config: &StoreConfig) -> Tangle {
        self.flush();
        Tangle::open(self.dir.path(), config).expect("Failed to open test tangle")
    }

    /// Flushes both logs so another reader sees every appended record.
    pub fn flush(&mut self) {
        self.transactions.flush().expect("Failed to flush transaction log");
        self.metadata.flush().expect("Failed to flush metadata log");
    }
}

impl Default for TestTangle {
    fn default() -> Self {
        Self::new()
    }
}

fn append(backend: &mut FileBackend, bytes: &[u8]) {
    backend.append(bytes).expect("Failed to append record");
}

/// Builds a hash from a readable label, padded with `9`s.
///
/// # Panics
///
/// Panics if the label is longer than a hash or not made of tryte characters.
pub fn test_hash(label: &str) -> Hash {
    assert!(label.len() <= HASH_TRYTES, "label too long for a hash");
    let trytes = format!("{label}{}", "9".repeat(HASH_TRYTES - label.len()));
    Hash::from_trytes(&trytes).expect("Invalid tryte label")
}

/// Builds a distinct hash for every `n`.
pub fn seeded_hash(n: u64) -> Hash {
    let alphabet = tangle_codec::TRYTE_ALPHABET;
    let mut trytes = vec![b'9'; HASH_TRYTES];
    let mut rest = n;
    for slot in &mut trytes {
        if rest == 0 {
            break;
        }
        *slot = alphabet[(rest % 27) as usize];
        rest /= 27;
    }
    let trytes = String::from_utf8(trytes).expect("Tryte alphabet is ASCII");
    Hash::from_trytes(&trytes).expect("Seeded hash is valid")
}

/// A full transaction made of a single repeated tryte.
pub fn transaction_trytes(fill: char) -> String {
    fill.to_string().repeat(TRANSACTION_TRYTES)
}

/// A payload of the right length that does not decode.
pub fn undecodable_payload() -> Vec<u8> {
    vec![0x7f; TRANSACTION_BYTES]
}

/// Metadata with distinct trunk, branch and bundle references derived from
/// `hash`, and no flags set.
pub fn sample_metadata(hash: Hash) -> TransactionMetadata {
    let trytes = hash.trytes();
    let derive = |tag: char| {
        let mut derived = String::with_capacity(HASH_TRYTES);
        derived.push(tag);
        derived.push_str(&trytes[..HASH_TRYTES - 1]);
        Hash::from_trytes(&derived).expect("Derived hash is valid")
    };
    TransactionMetadata::new(hash, derive('T'), derive('B'), derive('U'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_core::MetadataFlags;

    #[test]
    fn empty_fixture_opens() {
        let mut fixture = TestTangle::new();
        let tangle = fixture.open();
        assert!(tangle.metadata_store().is_empty());
        assert!(tangle.transactions().is_empty());
    }

    #[test]
    fn entries_are_readable() {
        let mut fixture = TestTangle::new();
        let meta = sample_metadata(test_hash("TX")).with_flags(MetadataFlags::SOLID);
        fixture.add_entry(&meta, &transaction_trytes('Q'));

        let tangle = fixture.open();
        let tx = tangle.transaction(&meta.hash()).unwrap().unwrap();
        assert_eq!(tx.trytes().unwrap(), transaction_trytes('Q'));
        let stored = tangle.metadata(&meta.hash()).unwrap().unwrap();
        assert_eq!(*stored, meta);
    }

    #[test]
    fn corrupt_record_fails_lookup_only() {
        let mut fixture = TestTangle::new();
        fixture.add_corrupt_transaction(test_hash("BAD"), &transaction_trytes('A'));

        let tangle = fixture.open();
        assert!(tangle.transactions().contains(&test_hash("BAD")));
        assert!(tangle.transaction(&test_hash("BAD")).is_err());
    }

    #[test]
    fn seeded_hashes_are_distinct() {
        assert_eq!(seeded_hash(0), Hash::NULL);
        assert_ne!(seeded_hash(1), seeded_hash(27));
        assert_ne!(seeded_hash(26), seeded_hash(27));
    }

    #[test]
    fn sample_metadata_links_differ() {
        let meta = sample_metadata(test_hash("TX"));
        assert_ne!(meta.trunk(), meta.branch());
        assert_ne!(meta.branch(), meta.bundle());
        assert_ne!(meta.trunk(), meta.hash());
    }
}
