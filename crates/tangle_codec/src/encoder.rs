//! Trytes to trits, trits to packed bytes.

use crate::error::{CodecError, CodecResult};
use crate::{Trit, TRITS_PER_BYTE, TRITS_PER_TRYTE, TRYTE_ALPHABET};

/// Converts one tryte character into three trits.
///
/// # Errors
///
/// Returns [`CodecError::InvalidTryte`] (position 0) for characters outside
/// the alphabet.
pub fn tryte_to_trits(tryte: char) -> CodecResult<[Trit; TRITS_PER_TRYTE]> {
    let index = TRYTE_ALPHABET
        .iter()
        .position(|&c| char::from(c) == tryte)
        .ok_or(CodecError::InvalidTryte {
            position: 0,
            character: tryte,
        })? as i32;

    let mut value = if index > 13 { index - 27 } else { index };
    let mut trits = [0; TRITS_PER_TRYTE];
    for trit in &mut trits {
        let mut rem = value % 3;
        if rem > 1 {
            rem -= 3;
        } else if rem < -1 {
            rem += 3;
        }
        *trit = rem as Trit;
        value = (value - rem) / 3;
    }
    Ok(trits)
}

/// Converts a tryte string into trits.
///
/// # Errors
///
/// Returns [`CodecError::InvalidTryte`] with the position of the first
/// character outside the alphabet.
pub fn trytes_to_trits(trytes: &str) -> CodecResult<Vec<Trit>> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for (position, character) in trytes.chars().enumerate() {
        let group = tryte_to_trits(character)
            .map_err(|_| CodecError::InvalidTryte { position, character })?;
        trits.extend_from_slice(&group);
    }
    Ok(trits)
}

/// Packs trits five to a byte. The last byte is zero-padded.
///
/// Trits are expected to be in `-1..=1`.
#[must_use]
pub fn encode_trits(trits: &[Trit]) -> Vec<u8> {
    trits
        .chunks(TRITS_PER_BYTE)
        .map(|chunk| {
            let value = chunk
                .iter()
                .rev()
                .fold(0i8, |acc, &t| acc * 3 + t);
            value as u8
        })
        .collect()
}
