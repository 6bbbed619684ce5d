//! Record framing shared by the transaction and metadata logs.
//!
//! ```text
//! | record_len u32 | key 49 bytes | flags u8 | value ... | crc32 u32 |
//! ```
//!
//! `record_len` counts the whole record. The CRC covers every byte before it.

use crate::error::{CoreError, CoreResult};
use tangle_codec::{Hash, HASH_BYTES};

/// Flags for store records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFlags(u8);

impl RecordFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// The key was deleted.
    pub const TOMBSTONE: Self = Self(0x01);

    /// Creates flags from the raw byte.
    #[must_use]
    pub const fn from_byte(b: u8) -> Self {
        Self(b)
    }

    /// Returns the raw byte value.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Checks if the tombstone flag is set.
    #[must_use]
    pub const fn is_tombstone(self) -> bool {
        self.0 & 0x01 != 0
    }
}

/// Header of a record, enough to index it without reading the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Total record length in bytes.
    pub record_len: u32,
    /// Packed key bytes, not yet validated.
    pub key: [u8; HASH_BYTES],
    /// Record flags.
    pub flags: RecordFlags,
}

impl RecordHeader {
    /// Parses a header from the first [`StoreRecord::HEADER_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Fails if `data` is short or the declared length cannot hold a record.
    pub fn parse(store: &'static str, data: &[u8]) -> CoreResult<Self> {
        if data.len() < StoreRecord::HEADER_SIZE {
            return Err(CoreError::store_corruption(store, "record header too short"));
        }

        let record_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if (record_len as usize) < StoreRecord::MIN_SIZE {
            return Err(CoreError::store_corruption(
                store,
                format!("impossible record length {record_len}"),
            ));
        }

        let mut key = [0u8; HASH_BYTES];
        key.copy_from_slice(&data[4..4 + HASH_BYTES]);

        Ok(Self {
            record_len,
            key,
            flags: RecordFlags::from_byte(data[4 + HASH_BYTES]),
        })
    }
}

/// A keyed record in one of the store logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord {
    /// The key.
    pub key: Hash,
    /// Record flags.
    pub flags: RecordFlags,
    /// Encoded value, empty for tombstones.
    pub value: Vec<u8>,
}

impl StoreRecord {
    /// Header size: record_len (4) + key (49) + flags (1).
    pub const HEADER_SIZE: usize = 4 + HASH_BYTES + 1;
    /// CRC size.
    pub const CRC_SIZE: usize = 4;
    /// Smallest valid record.
    pub const MIN_SIZE: usize = Self::HEADER_SIZE + Self::CRC_SIZE;

    /// Creates a record holding a value.
    #[must_use]
    pub fn put(key: Hash, value: Vec<u8>) -> Self {
        Self {
            key,
            flags: RecordFlags::NONE,
            value,
        }
    }

    /// Creates a tombstone for `key`.
    #[must_use]
    pub fn tombstone(key: Hash) -> Self {
        Self {
            key,
            flags: RecordFlags::TOMBSTONE,
            value: Vec::new(),
        }
    }

    /// Encodes the record to bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let record_len = Self::HEADER_SIZE + self.value.len() + Self::CRC_SIZE;
        let mut buf = Vec::with_capacity(record_len);

        buf.extend_from_slice(&(record_len as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());
        buf.push(self.flags.as_byte());
        buf.extend_from_slice(&self.value);

        let crc = crc32fast::hash(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());

        buf
    }

    /// Decodes a full record.
    ///
    /// The checksum is only checked when `verify` is set.
    ///
    /// # Errors
    ///
    /// Fails on a short or inconsistent record, an invalid key, or (with
    /// `verify`) a checksum mismatch.
    pub fn decode(store: &'static str, data: &[u8], verify: bool) -> CoreResult<Self> {
        let header = RecordHeader::parse(store, data)?;
        let record_len = header.record_len as usize;

        if data.len() != record_len {
            return Err(CoreError::store_corruption(
                store,
                format!("record length {record_len} but {} bytes read", data.len()),
            ));
        }

        if verify {
            let crc_at = record_len - Self::CRC_SIZE;
            let expected = u32::from_le_bytes([
                data[crc_at],
                data[crc_at + 1],
                data[crc_at + 2],
                data[crc_at + 3],
            ]);
            let actual = crc32fast::hash(&data[..crc_at]);
            if expected != actual {
                return Err(CoreError::ChecksumMismatch { expected, actual });
            }
        }

        Ok(Self {
            key: Hash::from_bytes(&header.key)?,
            flags: header.flags,
            value: data[Self::HEADER_SIZE..record_len - Self::CRC_SIZE].to_vec(),
        })
    }

    /// Returns the encoded size of this record.
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        Self::HEADER_SIZE + self.value.len() + Self::CRC_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Hash {
        Hash::from_trytes(&format!("{}{}", "KEY", "9".repeat(78))).unwrap()
    }

    #[test]
    fn encode_decode_put() {
        let record = StoreRecord::put(key(), vec![1, 2, 3]);
        let bytes = record.encode();
        assert_eq!(bytes.len(), record.encoded_size());

        let decoded = StoreRecord::decode("test", &bytes, true).unwrap();
        assert_eq!(decoded, record);
        assert!(!decoded.flags.is_tombstone());
    }

    #[test]
    fn tombstone_has_no_value() {
        let bytes = StoreRecord::tombstone(key()).encode();
        assert_eq!(bytes.len(), StoreRecord::MIN_SIZE);

        let decoded = StoreRecord::decode("test", &bytes, true).unwrap();
        assert!(decoded.flags.is_tombstone());
        assert!(decoded.value.is_empty());
    }

    #[test]
    fn checksum_mismatch_detected_only_when_verifying() {
        let mut bytes = StoreRecord::put(key(), vec![7; 10]).encode();
        bytes[StoreRecord::HEADER_SIZE + 2] ^= 0xff;

        assert!(matches!(
            StoreRecord::decode("test", &bytes, true),
            Err(CoreError::ChecksumMismatch { .. })
        ));
        let unchecked = StoreRecord::decode("test", &bytes, false).unwrap();
        assert_eq!(unchecked.value[2], 7 ^ 0xff);
    }

    #[test]
    fn impossible_length_rejected() {
        let mut bytes = StoreRecord::put(key(), vec![]).encode();
        bytes[..4].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            RecordHeader::parse("test", &bytes),
            Err(CoreError::StoreCorruption { store: "test", .. })
        ));
    }

    #[test]
    fn header_exposes_key_and_flags() {
        let bytes = StoreRecord::tombstone(key()).encode();
        let header = RecordHeader::parse("test", &bytes).unwrap();
        assert_eq!(&header.key, key().as_bytes());
        assert!(header.flags.is_tombstone());
        assert_eq!(header.record_len as usize, bytes.len());
    }
}
