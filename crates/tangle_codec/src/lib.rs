//! # Tangle Codec
//!
//! Trinary encoding for tangle hashes and transaction payloads.
//!
//! Values are balanced-ternary trits (`-1`, `0`, `1`). They appear in three
//! forms:
//!
//! - **trytes**: groups of three trits rendered with the alphabet
//!   `9ABCDEFGHIJKLMNOPQRSTUVWXYZ` (the canonical text form)
//! - **trits**: one `i8` per trit
//! - **packed bytes**: five trits per signed byte, as stored on disk
//!
//! ## Usage
//!
//! ```
//! use tangle_codec::{decode_transaction, encode_transaction, TRANSACTION_TRYTES};
//!
//! let trytes = "9".repeat(TRANSACTION_TRYTES);
//! let raw = encode_transaction(&trytes).unwrap();
//! assert_eq!(decode_transaction(&raw).unwrap(), trytes);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod hash;
mod transaction;

pub use decoder::{decode_trits, trits_to_trytes, unpack_byte};
pub use encoder::{encode_trits, tryte_to_trits, trytes_to_trits};
pub use error::{CodecError, CodecResult};
pub use hash::Hash;
pub use transaction::{decode_transaction, encode_transaction};

/// A balanced-ternary digit.
pub type Trit = i8;

/// Tryte alphabet, indexed by value (negative values wrap from the end).
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Trits per tryte.
pub const TRITS_PER_TRYTE: usize = 3;
/// Trits per packed byte.
pub const TRITS_PER_BYTE: usize = 5;
/// Largest magnitude a packed byte may hold.
pub const MAX_PACKED_BYTE: i8 = 121;

/// Trits in a hash.
pub const HASH_TRITS: usize = 243;
/// Trytes in a hash.
pub const HASH_TRYTES: usize = HASH_TRITS / TRITS_PER_TRYTE;
/// Packed bytes in a hash.
pub const HASH_BYTES: usize = HASH_TRITS.div_ceil(TRITS_PER_BYTE);

/// Trits in a transaction.
pub const TRANSACTION_TRITS: usize = 8019;
/// Trytes in a transaction.
pub const TRANSACTION_TRYTES: usize = TRANSACTION_TRITS / TRITS_PER_TRYTE;
/// Packed bytes in a transaction.
pub const TRANSACTION_BYTES: usize = TRANSACTION_TRITS.div_ceil(TRITS_PER_BYTE);
