//! Handle and lookup accounting for a store.
//!
//! Every [`CachedObject`](crate::CachedObject) handed out is counted as
//! acquired, and counted as released when it is dropped. After a run the two
//! must balance; [`HandleStats::outstanding`] is what tests check.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one store.
#[derive(Debug, Default)]
pub struct HandleStats {
    /// Total lookups.
    lookups: AtomicU64,
    /// Lookups for a key the store does not hold.
    misses: AtomicU64,
    /// Lookups that failed reading or decoding the record.
    read_errors: AtomicU64,
    /// Handles created, including clones.
    acquired: AtomicU64,
    /// Handles dropped.
    released: AtomicU64,
}

impl HandleStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_acquire(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of lookups.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Returns the number of lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns the number of lookups that failed.
    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }

    /// Returns the number of handles acquired.
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Returns the number of handles released.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Returns handles acquired but not yet released.
    pub fn outstanding(&self) -> u64 {
        self.acquired().saturating_sub(self.released())
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> HandleStatsSnapshot {
        HandleStatsSnapshot {
            lookups: self.lookups(),
            misses: self.misses(),
            read_errors: self.read_errors(),
            acquired: self.acquired(),
            released: self.released(),
        }
    }
}

/// A point-in-time copy of [`HandleStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleStatsSnapshot {
    /// Total lookups.
    pub lookups: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Lookups that failed.
    pub read_errors: u64,
    /// Handles acquired.
    pub acquired: u64,
    /// Handles released.
    pub released: u64,
}

impl std::ops::Add for HandleStatsSnapshot {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            lookups: self.lookups + other.lookups,
            misses: self.misses + other.misses,
            read_errors: self.read_errors + other.read_errors,
            acquired: self.acquired + other.acquired,
            released: self.released + other.released,
        }
    }
}
