//! Objects held by the two stores.

use crate::error::{CoreError, CoreResult};
use tangle_codec::{decode_transaction, CodecResult, Hash, HASH_BYTES};

/// Milestone number at which a transaction was confirmed.
pub type MilestoneIndex = u32;

/// A value type that can live in an [`ObjectStore`](crate::ObjectStore).
pub trait StoredObject: Sized + Send + Sync {
    /// Short name used in logs and errors.
    const KIND: &'static str;

    /// Decodes the stored value for `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidValue`] or a codec error if the bytes do
    /// not describe a valid object.
    fn from_value(hash: Hash, value: &[u8]) -> CoreResult<Self>;

    /// Encodes the object into its stored value.
    fn to_value(&self) -> Vec<u8>;
}

/// An immutable transaction record.
///
/// The payload is kept exactly as stored; decoding it to trytes is left to
/// the caller so a malformed payload only fails the code path that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    hash: Hash,
    raw: Vec<u8>,
}

impl Transaction {
    /// Creates a transaction record from its packed payload.
    #[must_use]
    pub fn new(hash: Hash, raw: Vec<u8>) -> Self {
        Self { hash, raw }
    }

    /// Returns the transaction hash.
    #[must_use]
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Returns the packed payload.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Decodes the payload into its 2673 trytes.
    ///
    /// # Errors
    ///
    /// Fails if the payload is malformed.
    pub fn trytes(&self) -> CodecResult<String> {
        decode_transaction(&self.raw)
    }
}

impl StoredObject for Transaction {
    const KIND: &'static str = "transaction";

    fn from_value(hash: Hash, value: &[u8]) -> CoreResult<Self> {
        Ok(Self::new(hash, value.to_vec()))
    }

    fn to_value(&self) -> Vec<u8> {
        self.raw.clone()
    }
}

/// Consensus flags of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetadataFlags(u8);

impl MetadataFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Whole referenced history is present.
    pub const SOLID: Self = Self(0x01);
    /// Confirmed by a milestone.
    pub const CONFIRMED: Self = Self(0x02);
    /// Part of a conflicting bundle.
    pub const CONFLICTING: Self = Self(0x04);
    /// Head of its bundle.
    pub const HEAD: Self = Self(0x08);
    /// Tail of its bundle.
    pub const TAIL: Self = Self(0x10);
    /// Carries a non-zero value.
    pub const VALUE: Self = Self(0x20);

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

    /// Checks whether every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns these flags with `other` set or cleared.
    #[must_use]
    pub const fn set(self, other: Self, value: bool) -> Self {
        if value {
            Self(self.0 | other.0)
        } else {
            Self(self.0 & !other.0)
        }
    }
}

/// Mutable consensus metadata of a transaction, read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMetadata {
    hash: Hash,
    flags: MetadataFlags,
    confirmation_index: MilestoneIndex,
    trunk: Hash,
    branch: Hash,
    bundle: Hash,
}

impl TransactionMetadata {
    /// Encoded size: flags (1) + confirmation index (4) + three hashes.
    pub const ENCODED_SIZE: usize = 1 + 4 + 3 * HASH_BYTES;

    /// Creates metadata with no flags set.
    #[must_use]
    pub fn new(hash: Hash, trunk: Hash, branch: Hash, bundle: Hash) -> Self {
        Self {
            hash,
            flags: MetadataFlags::NONE,
            confirmation_index: 0,
            trunk,
            branch,
            bundle,
        }
    }

    /// Sets flags. The confirmed flag is managed by [`Self::confirmed_at`].
    #[must_use]
    pub fn with_flags(mut self, flags: MetadataFlags) -> Self {
        let confirmed = self.is_confirmed();
        self.flags = flags.set(MetadataFlags::CONFIRMED, confirmed);
        self
    }

    /// Marks the transaction confirmed by milestone `index`.
    #[must_use]
    pub fn confirmed_at(mut self, index: MilestoneIndex) -> Self {
        self.flags = self.flags.set(MetadataFlags::CONFIRMED, true);
        self.confirmation_index = index;
        self
    }

    /// Returns the transaction hash.
    #[must_use]
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Returns the raw flags.
    #[must_use]
    pub fn flags(&self) -> MetadataFlags {
        self.flags
    }

    /// Returns the trunk reference.
    #[must_use]
    pub fn trunk(&self) -> Hash {
        self.trunk
    }

    /// Returns the branch reference.
    #[must_use]
    pub fn branch(&self) -> Hash {
        self.branch
    }

    /// Returns the bundle hash.
    #[must_use]
    pub fn bundle(&self) -> Hash {
        self.bundle
    }

    /// Whether the transaction is solid.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.flags.contains(MetadataFlags::SOLID)
    }

    /// Whether the transaction is confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.flags.contains(MetadataFlags::CONFIRMED)
    }

    /// Whether the transaction is part of a conflicting bundle.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        self.flags.contains(MetadataFlags::CONFLICTING)
    }

    /// Whether the transaction is the head of its bundle.
    #[must_use]
    pub fn is_head(&self) -> bool {
        self.flags.contains(MetadataFlags::HEAD)
    }

    /// Whether the transaction is the tail of its bundle.
    #[must_use]
    pub fn is_tail(&self) -> bool {
        self.flags.contains(MetadataFlags::TAIL)
    }

    /// Whether the transaction moves value.
    #[must_use]
    pub fn is_value(&self) -> bool {
        self.flags.contains(MetadataFlags::VALUE)
    }

    /// Confirmation state: the confirming milestone, if confirmed.
    #[must_use]
    pub fn confirmation(&self) -> Option<MilestoneIndex> {
        self.is_confirmed().then_some(self.confirmation_index)
    }
}

impl StoredObject for TransactionMetadata {
    const KIND: &'static str = "metadata";

    fn from_value(hash: Hash, value: &[u8]) -> CoreResult<Self> {
        if value.len() != Self::ENCODED_SIZE {
            return Err(CoreError::invalid_value(
                Self::KIND,
                format!(
                    "expected {} bytes, got {}",
                    Self::ENCODED_SIZE,
                    value.len()
                ),
            ));
        }

        let flags = MetadataFlags::from_byte(value[0]);
        let confirmation_index = u32::from_le_bytes([value[1], value[2], value[3], value[4]]);
        let hash_at = |n: usize| Hash::from_bytes(&value[5 + n * HASH_BYTES..5 + (n + 1) * HASH_BYTES]);

        Ok(Self {
            hash,
            flags,
            confirmation_index,
            trunk: hash_at(0)?,
            branch: hash_at(1)?,
            bundle: hash_at(2)?,
        })
    }

    fn to_value(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::ENCODED_SIZE);
        buf.push(self.flags.as_byte());
        buf.extend_from_slice(&self.confirmation_index.to_le_bytes());
        buf.extend_from_slice(self.trunk.as_bytes());
        buf.extend_from_slice(self.branch.as_bytes());
        buf.extend_from_slice(self.bundle.as_bytes());
        buf
    }
}
