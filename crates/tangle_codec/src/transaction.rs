//! Transaction payload codec.
//!
//! A stored transaction is 8019 trits packed into 1604 bytes. Its canonical
//! text form is the 2673-tryte string.

use crate::decoder::{decode_trits, trits_to_trytes};
use crate::encoder::{encode_trits, trytes_to_trits};
use crate::error::{CodecError, CodecResult};
use crate::{TRANSACTION_TRITS, TRANSACTION_TRYTES};

/// Decodes a packed transaction payload into its 2673 trytes.
///
/// # Errors
///
/// Fails when the payload is not 1604 bytes, holds a byte outside the
/// five-trit range, or has non-zero padding trits.
pub fn decode_transaction(raw: &[u8]) -> CodecResult<String> {
    let trits = decode_trits(raw, TRANSACTION_TRITS)?;
    Ok(trits_to_trytes(&trits))
}

/// Packs 2673 transaction trytes into the stored payload form.
///
/// # Errors
///
/// Fails on a wrong length or a character outside the tryte alphabet.
pub fn encode_transaction(trytes: &str) -> CodecResult<Vec<u8>> {
    if trytes.len() != TRANSACTION_TRYTES {
        return Err(CodecError::InvalidLength {
            expected: TRANSACTION_TRYTES,
            actual: trytes.len(),
        });
    }
    let trits = trytes_to_trits(trytes)?;
    Ok(encode_trits(&trits))
}
