//! Transaction hashes.

use crate::decoder::{decode_trits, trits_to_trytes, unpack_byte};
use crate::encoder::{encode_trits, trytes_to_trits};
use crate::error::{CodecError, CodecResult};
use crate::{Trit, HASH_BYTES, HASH_TRITS, HASH_TRYTES};
use std::fmt;

/// A 243-trit transaction hash in its packed 49-byte form.
///
/// Every constructor validates the packing, so rendering to trits or
/// trytes cannot fail afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    /// The all-zero hash (`999...9`), used for missing references.
    pub const NULL: Self = Self([0; HASH_BYTES]);

    /// Builds a hash from its packed bytes.
    ///
    /// # Errors
    ///
    /// Fails if `bytes` is not 49 bytes of valid five-trit packing.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        decode_trits(bytes, HASH_TRITS)?;
        let mut packed = [0; HASH_BYTES];
        packed.copy_from_slice(bytes);
        Ok(Self(packed))
    }

    /// Builds a hash from 81 trytes.
    ///
    /// # Errors
    ///
    /// Fails on a wrong length or a character outside the tryte alphabet.
    pub fn from_trytes(trytes: &str) -> CodecResult<Self> {
        if trytes.len() != HASH_TRYTES {
            return Err(CodecError::InvalidLength {
                expected: HASH_TRYTES,
                actual: trytes.len(),
            });
        }
        let trits = trytes_to_trits(trytes)?;
        let mut packed = [0; HASH_BYTES];
        packed.copy_from_slice(&encode_trits(&trits));
        Ok(Self(packed))
    }

    /// Returns the packed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// Returns the 243 trits.
    #[must_use]
    pub fn trits(&self) -> Vec<Trit> {
        let mut trits: Vec<Trit> = self.0.iter().flat_map(|&b| unpack_byte(b)).collect();
        trits.truncate(HASH_TRITS);
        trits
    }

    /// Returns the 81-tryte rendering.
    #[must_use]
    pub fn trytes(&self) -> String {
        trits_to_trytes(&self.trits())
    }

    /// Returns whether this is [`Hash::NULL`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trytes())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trytes = self.trytes();
        write!(f, "Hash({}..)", &trytes[..12])
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> CodecResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl std::str::FromStr for Hash {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        Self::from_trytes(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUNK: &str =
        "QCGTIXEHZRZLWTXHAZJYKBNPOLSUPSIRCBWBIRDDMZPSGFOYTMXBCFGAHQMHJGUGVHZFXAWRQKTQ99999";

    #[test]
    fn null_hash_renders_as_nines() {
        assert!(Hash::NULL.is_null());
        assert_eq!(Hash::NULL.trytes(), "9".repeat(81));
    }

    #[test]
    fn trytes_survive_packing() {
        let hash = Hash::from_trytes(TRUNK).unwrap();
        assert_eq!(hash.trytes(), TRUNK);
        assert_eq!(hash.to_string(), TRUNK);
        assert!(!hash.is_null());

        let again = Hash::from_bytes(hash.as_bytes()).unwrap();
        assert_eq!(again, hash);
    }

    #[test]
    fn from_trytes_rejects_bad_input() {
        assert!(matches!(
            Hash::from_trytes("ABC"),
            Err(CodecError::InvalidLength {
                expected: 81,
                actual: 3
            })
        ));
        let lower = TRUNK.to_lowercase();
        assert!(matches!(
            Hash::from_trytes(&lower),
            Err(CodecError::InvalidTryte { position: 0, .. })
        ));
    }

    #[test]
    fn from_bytes_rejects_bad_packing() {
        assert!(Hash::from_bytes(&[0; 48]).is_err());

        let mut bytes = [0u8; HASH_BYTES];
        bytes[10] = 127;
        assert!(matches!(
            Hash::from_bytes(&bytes),
            Err(CodecError::InvalidByte { offset: 10, .. })
        ));

        // 243 trits leave two padding trits in the last byte.
        let mut padded = [0u8; HASH_BYTES];
        padded[HASH_BYTES - 1] = 27;
        assert_eq!(Hash::from_bytes(&padded), Err(CodecError::NonZeroPadding));
    }

    #[test]
    fn debug_is_shortened() {
        let hash = Hash::from_trytes(TRUNK).unwrap();
        assert_eq!(format!("{hash:?}"), "Hash(QCGTIXEHZRZL..)");
    }
}
