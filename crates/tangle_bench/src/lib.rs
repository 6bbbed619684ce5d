//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::Rng;
use tangle_codec::{encode_transaction, TRANSACTION_TRYTES, TRYTE_ALPHABET};
use tangle_core::MetadataFlags;
use tangle_testkit::{sample_metadata, seeded_hash, TestTangle};

/// Generate random trytes of the specified length.
pub fn random_trytes(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(TRYTE_ALPHABET[rng.gen_range(0..TRYTE_ALPHABET.len())]))
        .collect()
}

/// Generate a random packed transaction payload.
pub fn random_payload() -> Vec<u8> {
    encode_transaction(&random_trytes(TRANSACTION_TRYTES)).expect("Random trytes are valid")
}

/// Generate a store directory with `count` complete entries.
///
/// Every tenth entry is confirmed, so rows with and without a confirmation
/// index are both exercised.
pub fn populated_tangle(count: u64) -> TestTangle {
    let mut fixture = TestTangle::new();
    for n in 1..=count {
        let mut meta = sample_metadata(seeded_hash(n))
            .with_flags(MetadataFlags::SOLID.set(MetadataFlags::TAIL, n % 2 == 0));
        if n % 10 == 0 {
            meta = meta.confirmed_at(u32::try_from(n).unwrap_or(u32::MAX));
        }
        fixture.add_entry(&meta, &random_trytes(TRANSACTION_TRYTES));
    }
    fixture
}
