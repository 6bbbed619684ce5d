//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input does not have the length the encoding requires.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// A packed byte lies outside the five-trit range.
    #[error("invalid packed byte {value} at offset {offset}")]
    InvalidByte {
        /// Offset of the byte in the input.
        offset: usize,
        /// The byte, read as a signed value.
        value: i8,
    },

    /// Trits beyond the encoded length were not zero.
    #[error("non-zero padding trits in last byte")]
    NonZeroPadding,

    /// A character outside the tryte alphabet.
    #[error("invalid tryte {character:?} at position {position}")]
    InvalidTryte {
        /// Position of the character.
        position: usize,
        /// The offending character.
        character: char,
    },
}
