//! Store configuration.

/// Options for opening the tangle stores.
///
/// Built once at start-up and passed to [`Tangle::open`](crate::Tangle::open).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Verify each record's CRC on lookup.
    pub verify_checksums: bool,

    /// Take a shared advisory lock on the store files while they are open.
    pub lock_files: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            lock_files: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether lookups verify record checksums.
    #[must_use]
    pub const fn verify_checksums(mut self, value: bool) -> Self {
        self.verify_checksums = value;
        self
    }

    /// Sets whether store files are locked while open.
    #[must_use]
    pub const fn lock_files(mut self, value: bool) -> Self {
        self.lock_files = value;
        self
    }
}
