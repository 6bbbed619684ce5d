//! Store summary used by the `inspect` command.

use serde::Serialize;
use std::path::Path;
use tangle_core::{CoreResult, ObjectStore, Tangle};

/// Summary of one store log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    /// Store name.
    pub name: &'static str,
    /// Log size in bytes.
    pub size: u64,
    /// Live entries.
    pub entries: usize,
    /// Records skipped while indexing.
    pub skipped: usize,
}

impl StoreSummary {
    fn of<T>(store: &ObjectStore<T>) -> CoreResult<Self> {
        Ok(Self {
            name: store.name(),
            size: store.storage_size()?,
            entries: store.len(),
            skipped: store.skipped(),
        })
    }
}

/// Result of inspecting a store directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Store directory.
    pub path: String,
    /// Transaction record log.
    pub transactions: StoreSummary,
    /// Metadata log.
    pub metadata: StoreSummary,
    /// Metadata entries with no transaction record. Each one would be a
    /// missing-record failure in an export.
    pub orphan_metadata: usize,
    /// Transaction records with no metadata. An export never visits these.
    pub unindexed_transactions: usize,
}

impl InspectReport {
    /// Builds the summary from index state only; no record is read.
    ///
    /// # Errors
    ///
    /// Fails if a store size cannot be read or the metadata log cannot be
    /// traversed.
    pub fn collect(tangle: &Tangle) -> CoreResult<Self> {
        let transactions = tangle.transactions();
        let metadata = tangle.metadata_store();

        let mut orphan_metadata = 0;
        let mut indexed = 0;
        for hash in tangle.metadata_hashes() {
            if transactions.contains(&hash?) {
                indexed += 1;
            } else {
                orphan_metadata += 1;
            }
        }

        Ok(Self {
            path: tangle
                .path()
                .map_or_else(|| "<memory>".to_owned(), |p: &Path| p.display().to_string()),
            transactions: StoreSummary::of(transactions)?,
            metadata: StoreSummary::of(metadata)?,
            orphan_metadata,
            unindexed_transactions: transactions.len() - indexed,
        })
    }

    /// Total bytes across both logs.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.transactions.size + self.metadata.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_codec::{Hash, TRANSACTION_BYTES};
    use tangle_core::{StoreConfig, StoreRecord, StoredObject, Transaction, TransactionMetadata};
    use tangle_storage::InMemoryBackend;

    fn hash(prefix: &str) -> Hash {
        Hash::from_trytes(&format!("{prefix}{}", "9".repeat(81 - prefix.len()))).unwrap()
    }

    fn tx(name: &str) -> Vec<u8> {
        let tx = Transaction::new(hash(name), vec![0; TRANSACTION_BYTES]);
        StoreRecord::put(tx.hash(), tx.to_value()).encode()
    }

    fn meta(name: &str) -> Vec<u8> {
        let meta = TransactionMetadata::new(hash(name), Hash::NULL, Hash::NULL, Hash::NULL);
        StoreRecord::put(meta.hash(), meta.to_value()).encode()
    }

    #[test]
    fn counts_orphans_both_ways() {
        let transactions: Vec<u8> = [tx("A"), tx("B"), tx("C")].concat();
        let metadata: Vec<u8> = [meta("A"), meta("D")].concat();
        let tx_size = transactions.len() as u64;

        let tangle = Tangle::from_backends(
            Box::new(InMemoryBackend::with_data(transactions)),
            Box::new(InMemoryBackend::with_data(metadata)),
            &StoreConfig::new(),
        )
        .unwrap();

        let report = InspectReport::collect(&tangle).unwrap();
        assert_eq!(report.path, "<memory>");
        assert_eq!(report.transactions.entries, 3);
        assert_eq!(report.transactions.size, tx_size);
        assert_eq!(report.metadata.entries, 2);
        assert_eq!(report.orphan_metadata, 1);
        assert_eq!(report.unindexed_transactions, 2);
        assert_eq!(tangle.handle_stats().acquired, 0);
    }
}
