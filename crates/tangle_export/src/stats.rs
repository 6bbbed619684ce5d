//! Run-level counters.

use crate::error::ItemFailure;
use serde::Serialize;
use std::fmt;

/// Counters for one export run.
///
/// Every index entry increments `total_seen` and then exactly one of
/// `success_count` or a failure bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunStats {
    /// Index entries visited.
    pub total_seen: u64,
    /// Rows written.
    pub success_count: u64,
    /// Entries with no transaction record.
    pub records_missing: u64,
    /// Entries with no metadata.
    pub metadata_missing: u64,
    /// Entries whose record or metadata could not be read.
    pub lookup_failures: u64,
    /// Entries whose payload did not decode.
    pub decode_failures: u64,
    /// Rows that could not be serialized or written.
    pub write_failures: u64,
}

impl RunStats {
    /// Counts a failed entry in its bucket.
    pub fn record_failure(&mut self, failure: &ItemFailure) {
        let bucket = match failure {
            ItemFailure::TransactionNotFound => &mut self.records_missing,
            ItemFailure::MetadataNotFound => &mut self.metadata_missing,
            ItemFailure::TransactionLookup(_) | ItemFailure::MetadataLookup(_) => {
                &mut self.lookup_failures
            }
            ItemFailure::Decode(_) => &mut self.decode_failures,
            ItemFailure::Write => &mut self.write_failures,
        };
        *bucket += 1;
    }

    /// Entries that produced no row.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.records_missing
            + self.metadata_missing
            + self.lookup_failures
            + self.decode_failures
            + self.write_failures
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total txs: {}, success: {}",
            self.total_seen, self.success_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_land_in_buckets() {
        let mut stats = RunStats::default();
        stats.record_failure(&ItemFailure::TransactionNotFound);
        stats.record_failure(&ItemFailure::MetadataNotFound);
        stats.record_failure(&ItemFailure::Write);
        stats.record_failure(&ItemFailure::Decode(
            tangle_codec::CodecError::NonZeroPadding,
        ));

        assert_eq!(stats.records_missing, 1);
        assert_eq!(stats.metadata_missing, 1);
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(stats.failures(), 4);
    }

    #[test]
    fn display_reports_headline_counters() {
        let stats = RunStats {
            total_seen: 2,
            success_count: 1,
            ..RunStats::default()
        };
        assert_eq!(stats.to_string(), "total txs: 2, success: 1");
    }
}
