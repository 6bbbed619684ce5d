//! The join-and-export pipeline.
//!
//! For every hash in the metadata index:
//!
//! 1. count it as seen
//! 2. look up the transaction record
//! 3. decode its payload to trytes
//! 4. look up the metadata
//! 5. build the row
//! 6. release both handles
//! 7. write the row
//!
//! A failure at any step is logged against that hash and the pipeline moves
//! on. Handles live only inside [`ExportPipeline::build`], so they are
//! released before the row is written, whichever way that function returns.

use crate::error::{ExportError, ExportResult, ItemFailure};
use crate::row::{build_row, ExportRow};
use crate::sink::Sink;
use crate::stats::RunStats;
use std::io::Write;
use tangle_codec::{decode_transaction, Hash};
use tangle_core::Tangle;

/// Pipeline lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, not yet run.
    Idle,
    /// Traversing the index.
    Running,
    /// Traversal finished or stopped.
    Done,
}

/// Drives one export run over a [`Tangle`] into a [`Sink`].
#[derive(Debug)]
pub struct ExportPipeline<'a, W: Write> {
    tangle: &'a Tangle,
    sink: Sink<W>,
    stats: RunStats,
    state: PipelineState,
    limit: Option<u64>,
}

impl<'a, W: Write> ExportPipeline<'a, W> {
    /// Creates an idle pipeline.
    pub fn new(tangle: &'a Tangle, sink: Sink<W>) -> Self {
        Self {
            tangle,
            sink,
            stats: RunStats::default(),
            state: PipelineState::Idle,
            limit: None,
        }
    }

    /// Stops the traversal after `limit` index entries.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Traverses the whole metadata index, exporting every entry it can.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidState`] if the pipeline has already run
    /// - [`ExportError::Traversal`] if reading the index itself fails; rows
    ///   written before that point stay in the output
    pub fn run(&mut self) -> ExportResult<RunStats> {
        if self.state != PipelineState::Idle {
            return Err(ExportError::InvalidState {
                expected: PipelineState::Idle,
                actual: self.state,
            });
        }
        self.state = PipelineState::Running;

        let tangle = self.tangle;
        for hash in tangle.metadata_hashes() {
            if self.limit.is_some_and(|limit| self.stats.total_seen >= limit) {
                tracing::info!(limit = self.limit, "row limit reached, stopping traversal");
                break;
            }

            let hash = match hash {
                Ok(hash) => hash,
                Err(source) => {
                    self.state = PipelineState::Done;
                    tracing::error!(error = %source, "metadata index traversal failed");
                    return Err(ExportError::Traversal {
                        source,
                        stats: self.stats,
                    });
                }
            };

            self.process(hash);
        }

        self.state = PipelineState::Done;
        tracing::info!(
            total = self.stats.total_seen,
            success = self.stats.success_count,
            failed = self.stats.failures(),
            "export finished"
        );

        Ok(self.stats)
    }

    /// Exports a single index entry and updates the counters.
    fn process(&mut self, hash: Hash) {
        self.stats.total_seen += 1;

        let outcome = self.build(hash).and_then(|row| {
            if self.sink.write(&row) {
                Ok(row)
            } else {
                Err(ItemFailure::Write)
            }
        });

        match outcome {
            Ok(row) => {
                self.stats.success_count += 1;
                tracing::debug!(tx_hash = %row.tx_hash, "done");
            }
            Err(failure) => {
                tracing::warn!(tx_hash = %hash, kind = failure.kind(), "{failure}");
                self.stats.record_failure(&failure);
            }
        }
    }

    /// Joins the record and metadata for `hash` into a row.
    ///
    /// Both handles are dropped when this returns.
    pub fn build(&self, hash: Hash) -> Result<ExportRow, ItemFailure> {
        let tx = self
            .tangle
            .transaction(&hash)
            .map_err(ItemFailure::TransactionLookup)?
            .ok_or(ItemFailure::TransactionNotFound)?;

        let trytes = decode_transaction(tx.raw()).map_err(ItemFailure::Decode)?;

        let meta = self
            .tangle
            .metadata(&hash)
            .map_err(ItemFailure::MetadataLookup)?
            .ok_or(ItemFailure::MetadataNotFound)?;

        Ok(build_row(hash, &meta, trytes))
    }

    /// Consumes the pipeline, returning its sink.
    pub fn into_sink(self) -> Sink<W> {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_codec::{encode_transaction, TRANSACTION_TRYTES};
    use tangle_core::{StoreConfig, StoreRecord, StoredObject, Transaction, TransactionMetadata};
    use tangle_storage::InMemoryBackend;

    fn hash(prefix: &str) -> Hash {
        Hash::from_trytes(&format!("{prefix}{}", "9".repeat(81 - prefix.len()))).unwrap()
    }

    fn payload(fill: char) -> Vec<u8> {
        encode_transaction(&fill.to_string().repeat(TRANSACTION_TRYTES)).unwrap()
    }

    struct Fixture {
        transactions: Vec<u8>,
        metadata: Vec<u8>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                transactions: Vec::new(),
                metadata: Vec::new(),
            }
        }

        fn tx(mut self, name: &str, raw: Vec<u8>) -> Self {
            let tx = Transaction::new(hash(name), raw);
            self.transactions
                .extend(StoreRecord::put(tx.hash(), tx.to_value()).encode());
            self
        }

        fn meta(mut self, name: &str) -> Self {
            let meta = TransactionMetadata::new(hash(name), Hash::NULL, Hash::NULL, Hash::NULL);
            self.metadata
                .extend(StoreRecord::put(meta.hash(), meta.to_value()).encode());
            self
        }

        fn tangle(self) -> Tangle {
            Tangle::from_backends(
                Box::new(InMemoryBackend::with_data(self.transactions)),
                Box::new(InMemoryBackend::with_data(self.metadata)),
                &StoreConfig::new(),
            )
            .unwrap()
        }
    }

    #[test]
    fn state_transitions() {
        let tangle = Fixture::new().tx("A", payload('A')).meta("A").tangle();
        let mut pipeline = ExportPipeline::new(&tangle, Sink::new(Vec::new()));
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let stats = pipeline.run().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(stats.success_count, 1);

        assert!(matches!(
            pipeline.run(),
            Err(ExportError::InvalidState {
                expected: PipelineState::Idle,
                actual: PipelineState::Done
            })
        ));
    }

    #[test]
    fn every_failure_kind_is_isolated() {
        let tangle = Fixture::new()
            .tx("OK", payload('B'))
            .meta("OK")
            .meta("NORECORD")
            .tx("BADPAYLOAD", vec![0x7f; 1604])
            .meta("BADPAYLOAD")
            .tx("NOMETA", payload('C'))
            .meta("LAST")
            .tx("LAST", payload('D'))
            .tangle();

        let mut pipeline = ExportPipeline::new(&tangle, Sink::new(Vec::new()));
        let stats = pipeline.run().unwrap();

        assert_eq!(stats.total_seen, 4);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.records_missing, 1);
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(stats.metadata_missing, 0);
        assert_eq!(stats.success_count + stats.failures(), stats.total_seen);
        assert_eq!(tangle.outstanding_handles(), 0);
    }

    #[test]
    fn build_reports_missing_metadata() {
        let tangle = Fixture::new().tx("A", payload('A')).tangle();
        let pipeline = ExportPipeline::new(&tangle, Sink::new(Vec::new()));

        assert!(matches!(
            pipeline.build(hash("A")),
            Err(ItemFailure::MetadataNotFound)
        ));
        assert_eq!(tangle.outstanding_handles(), 0);
        assert_eq!(tangle.handle_stats().acquired, 1);
    }

    #[test]
    fn limit_stops_traversal() {
        let tangle = Fixture::new()
            .tx("A", payload('A'))
            .meta("A")
            .meta("B")
            .meta("C")
            .tangle();

        let mut pipeline = ExportPipeline::new(&tangle, Sink::new(Vec::new())).with_limit(Some(2));
        let stats = pipeline.run().unwrap();
        assert_eq!(stats.total_seen, 2);
        assert_eq!(stats.success_count, 1);
        assert_eq!(pipeline.state(), PipelineState::Done);
    }

    #[test]
    fn rows_reach_the_sink() {
        let tangle = Fixture::new()
            .tx("A", payload('A'))
            .meta("A")
            .tangle();

        let mut pipeline = ExportPipeline::new(&tangle, Sink::new(Vec::new()));
        pipeline.run().unwrap();
        let out = pipeline.into_sink().finish().unwrap();

        let row: ExportRow = serde_json::from_slice(&out).unwrap();
        assert_eq!(row.tx_hash, hash("A").trytes());
        assert_eq!(row.trytes, "A".repeat(TRANSACTION_TRYTES));
        assert_eq!(row.confirmation_index, None);
    }

    /// Rejects the first write, then passes everything through.
    #[derive(Debug, Default)]
    struct FailsOnce {
        data: Vec<u8>,
        failed: bool,
    }

    impl Write for FailsOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::other("disk full"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn two_entries() -> Tangle {
        Fixture::new()
            .tx("A", payload('A'))
            .meta("A")
            .tx("B", payload('B'))
            .meta("B")
            .tangle()
    }

    #[test]
    fn write_failure_skips_only_that_row() {
        let tangle = two_entries();
        let mut pipeline = ExportPipeline::new(&tangle, Sink::new(FailsOnce::default()));
        let stats = pipeline.run().unwrap();

        assert_eq!(stats.total_seen, 2);
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.success_count + stats.failures(), stats.total_seen);
        assert_eq!(tangle.outstanding_handles(), 0);

        let out = pipeline.into_sink().finish().unwrap().data;
        let row: ExportRow = serde_json::from_slice(&out).unwrap();
        assert_eq!(row.tx_hash, hash("B").trytes());
        assert_eq!(row.trytes, "B".repeat(TRANSACTION_TRYTES));
    }

    #[test]
    fn write_failure_logs_one_warning() {
        let tangle = two_entries();
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();

        let stats = tracing::subscriber::with_default(subscriber, || {
            ExportPipeline::new(&tangle, Sink::new(FailsOnce::default()))
                .run()
                .unwrap()
        });
        assert_eq!(stats.write_failures, 1);

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<_> = logs.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 1, "{logs}");
        assert!(warnings[0].contains(&hash("A").trytes()));
        assert!(logs.contains("cannot write row to output"));
    }
}
