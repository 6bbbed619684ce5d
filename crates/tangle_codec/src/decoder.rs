//! Packed bytes to trits, trits to trytes.

use crate::error::{CodecError, CodecResult};
use crate::{Trit, MAX_PACKED_BYTE, TRITS_PER_BYTE, TRITS_PER_TRYTE, TRYTE_ALPHABET};

/// Unpacks a five-trit byte into balanced trits, least significant first.
///
/// Bytes outside `-121..=121` still unpack; the excess is dropped. Callers
/// that need validation go through [`decode_trits`].
#[must_use]
pub fn unpack_byte(byte: u8) -> [Trit; TRITS_PER_BYTE] {
    let mut value = i32::from(byte as i8);
    let mut trits = [0; TRITS_PER_BYTE];

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

    trits
}

/// Decodes packed bytes into exactly `num_trits` trits.
///
/// # Errors
///
/// - [`CodecError::InvalidLength`] if `bytes` is not exactly the packed size
///   of `num_trits`
/// - [`CodecError::InvalidByte`] if a byte is outside the five-trit range
/// - [`CodecError::NonZeroPadding`] if the unused trits of the last byte are set
pub fn decode_trits(bytes: &[u8], num_trits: usize) -> CodecResult<Vec<Trit>> {
    let expected = num_trits.div_ceil(TRITS_PER_BYTE);
    if bytes.len() != expected {
        return Err(CodecError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }

    let mut trits = Vec::with_capacity(expected * TRITS_PER_BYTE);
    for (offset, &byte) in bytes.iter().enumerate() {
        let value = byte as i8;
        if value.unsigned_abs() > MAX_PACKED_BYTE as u8 {
            return Err(CodecError::InvalidByte { offset, value });
        }
        trits.extend_from_slice(&unpack_byte(byte));
    }

    if trits[num_trits..].iter().any(|&t| t != 0) {
        return Err(CodecError::NonZeroPadding);
    }
    trits.truncate(num_trits);

    Ok(trits)
}

/// Renders trits as trytes, three trits per character.
///
/// A trailing partial group is padded with zero trits.
#[must_use]
pub fn trits_to_trytes(trits: &[Trit]) -> String {
    trits
        .chunks(TRITS_PER_TRYTE)
        .map(|chunk| {
            let value = chunk
                .iter()
                .rev()
                .fold(0i32, |acc, &t| acc * 3 + i32::from(t));
            let index = if value < 0 { value + 27 } else { value };
            char::from(TRYTE_ALPHABET[index as usize])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_small_values() {
        assert_eq!(unpack_byte(0), [0, 0, 0, 0, 0]);
        assert_eq!(unpack_byte(1), [1, 0, 0, 0, 0]);
        assert_eq!(unpack_byte(2), [-1, 1, 0, 0, 0]);
        assert_eq!(unpack_byte((-4i8) as u8), [-1, -1, 0, 0, 0]);
    }

    #[test]
    fn unpack_range_limits() {
        assert_eq!(unpack_byte(121), [1, 1, 1, 1, 1]);
        assert_eq!(unpack_byte((-121i8) as u8), [-1, -1, -1, -1, -1]);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = decode_trits(&[0; 3], 243).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidLength {
                expected: 49,
                actual: 3
            }
        );
    }

    #[test]
    fn decode_rejects_out_of_range_byte() {
        let err = decode_trits(&[0, 122], 10).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidByte {
                offset: 1,
                value: 122
            }
        );
    }

    #[test]
    fn decode_rejects_set_padding() {
        // 7 trits occupy two bytes; trit 7 (value 9 in byte two) is padding.
        let err = decode_trits(&[0, 9], 7).unwrap_err();
        assert_eq!(err, CodecError::NonZeroPadding);
        assert_eq!(decode_trits(&[0, 4], 7).unwrap(), vec![0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn trytes_from_trits() {
        assert_eq!(trits_to_trytes(&[0, 0, 0]), "9");
        assert_eq!(trits_to_trytes(&[1, 0, 0]), "A");
        assert_eq!(trits_to_trytes(&[1, 1, 1]), "M");
        assert_eq!(trits_to_trytes(&[-1, -1, -1]), "N");
        assert_eq!(trits_to_trytes(&[-1, 0, 0]), "Z");
        assert_eq!(trits_to_trytes(&[1, 0, 0, 1]), "AA");
    }
}
