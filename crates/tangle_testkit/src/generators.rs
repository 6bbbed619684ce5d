//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random tangle content that stays
//! within the codec's invariants.

use crate::fixtures::{undecodable_payload, TestTangle};
use proptest::prelude::*;
use tangle_codec::{Hash, HASH_TRYTES, TRANSACTION_TRYTES};
use tangle_core::{MetadataFlags, MilestoneIndex, TransactionMetadata};

/// Strategy for generating tryte strings of a fixed length.
pub fn trytes_strategy(len: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[9A-Z]{{{len}}}")).expect("Invalid regex")
}

/// Strategy for generating valid hashes.
pub fn hash_strategy() -> impl Strategy<Value = Hash> {
    trytes_strategy(HASH_TRYTES).prop_map(|t| Hash::from_trytes(&t).expect("Valid hash trytes"))
}

/// Strategy for generating full transaction trytes.
pub fn transaction_trytes_strategy() -> impl Strategy<Value = String> {
    trytes_strategy(TRANSACTION_TRYTES)
}

/// Strategy for generating metadata flags.
pub fn flags_strategy() -> impl Strategy<Value = MetadataFlags> {
    (0u8..0x40).prop_map(MetadataFlags::from_byte)
}

/// Strategy for generating metadata for `hash`, confirmed or not.
pub fn metadata_strategy(hash: Hash) -> impl Strategy<Value = TransactionMetadata> {
    (
        hash_strategy(),
        hash_strategy(),
        hash_strategy(),
        flags_strategy(),
        prop::option::of(any::<MilestoneIndex>()),
    )
        .prop_map(move |(trunk, branch, bundle, flags, confirmed)| {
            let meta = TransactionMetadata::new(hash, trunk, branch, bundle).with_flags(flags);
            match confirmed {
                Some(index) => meta.confirmed_at(index),
                None => meta,
            }
        })
}

/// What a generated index entry looks like on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Record and metadata both present and valid.
    Complete,
    /// Metadata with no transaction record.
    MissingRecord,
    /// Record whose payload does not decode.
    Undecodable,
    /// Record whose checksum does not match.
    Corrupt,
    /// Record present but its metadata deleted, so the entry is never indexed.
    DeletedMetadata,
}

impl EntryKind {
    /// Whether the entry is visited by an export.
    pub fn is_indexed(self) -> bool {
        self != Self::DeletedMetadata
    }

    /// Whether an export produces a row for the entry.
    pub fn exports(self) -> bool {
        self == Self::Complete
    }
}

/// Strategy for generating entry kinds, weighted towards complete entries.
pub fn entry_kind_strategy() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        4 => Just(EntryKind::Complete),
        1 => Just(EntryKind::MissingRecord),
        1 => Just(EntryKind::Undecodable),
        1 => Just(EntryKind::Corrupt),
        1 => Just(EntryKind::DeletedMetadata),
    ]
}

/// Writes one generated entry for `hash` into `fixture`.
pub fn write_entry(fixture: &mut TestTangle, hash: Hash, kind: EntryKind) {
    let meta = crate::fixtures::sample_metadata(hash);
    let trytes = crate::fixtures::transaction_trytes('A');
    match kind {
        EntryKind::Complete => {
            fixture.add_entry(&meta, &trytes);
        }
        EntryKind::MissingRecord => {
            fixture.add_metadata(&meta);
        }
        EntryKind::Undecodable => {
            fixture
                .add_raw_transaction(hash, undecodable_payload())
                .add_metadata(&meta);
        }
        EntryKind::Corrupt => {
            fixture.add_corrupt_transaction(hash, &trytes).add_metadata(&meta);
        }
        EntryKind::DeletedMetadata => {
            fixture
                .add_entry(&meta, &trytes)
                .delete_metadata(hash);
        }
    }
}
