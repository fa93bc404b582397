use crate::{
    assembler::BatchAssembler,
    config::ImportConfig,
    error::ImportError,
    executor::{BatchExecutor, WriteOutcome},
    partition::Partition,
};
use connectors::file::csv::source::{CsvSource, SourceItem};
use model::{
    records::batch::Batch,
    report::{BatchFailure, RejectedRow},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Per-worker counts and errors, merged into the run report by the
/// coordinator once the worker completes.
#[derive(Debug, Default)]
pub struct WorkerOutcome {
    pub worker_id: usize,
    pub rows_read: u64,
    pub rows_inserted: u64,
    pub rows_rejected: u64,
    pub rows_failed: u64,
    pub batches_executed: u64,
    pub rejected_rows: Vec<RejectedRow>,
    pub batch_failures: Vec<BatchFailure>,
    pub aborted: bool,
}

/// One sequential read -> filter -> project -> batch -> write chain.
///
/// The worker owns its file handle and its sink; the only state it
/// shares with the rest of the run is the outcome it returns.
pub struct ImportWorker {
    id: usize,
    config: ImportConfig,
    partition: Partition,
    executor: BatchExecutor,
    cancel: CancellationToken,
}

impl ImportWorker {
    pub fn new(
        id: usize,
        config: ImportConfig,
        executor: BatchExecutor,
        cancel: CancellationToken,
    ) -> Self {
        let partition = Partition::new(id, config.worker_count);
        ImportWorker {
            id,
            config,
            partition,
            executor,
            cancel,
        }
    }

    pub async fn run(mut self) -> Result<WorkerOutcome, ImportError> {
        let mut outcome = WorkerOutcome {
            worker_id: self.id,
            ..Default::default()
        };

        // Each worker reopens the file and advances its own cursor.
        let mut source = CsvSource::open(&self.config.source_path, self.config.delimiter_byte())?;
        let mut assembler = BatchAssembler::new(self.id, self.config.max_batch_size);
        let mut cancelled = false;

        loop {
            // Cooperative abort: submitted batches complete, no new
            // batch is started, rows still buffered are discarded.
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(item) = source.next_item()? else {
                break;
            };

            match item {
                SourceItem::Row(row) => {
                    if !self.partition.owns(row.ordinal) {
                        continue;
                    }
                    outcome.rows_read += 1;

                    match self.config.mapping.project(&row) {
                        Ok(projected) => {
                            if let Some(batch) = assembler.push(projected) {
                                self.submit(&batch, &mut outcome).await;
                            }
                        }
                        Err(err) => {
                            warn!(worker = self.id, ordinal = row.ordinal, "Rejected row: {err}");
                            outcome.rows_rejected += 1;
                            outcome.rejected_rows.push(RejectedRow {
                                ordinal: row.ordinal,
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                SourceItem::Rejected { ordinal, reason } => {
                    if !self.partition.owns(ordinal) {
                        continue;
                    }
                    warn!(worker = self.id, ordinal, "Rejected row: {reason}");
                    outcome.rows_read += 1;
                    outcome.rows_rejected += 1;
                    outcome.rejected_rows.push(RejectedRow { ordinal, reason });
                }
            }
        }

        // The trailing partial batch must be flushed, or the last
        // `< max_batch_size` rows of this worker's share are lost.
        if !cancelled
            && let Some(batch) = assembler.flush()
        {
            self.submit(&batch, &mut outcome).await;
        }
        outcome.aborted = cancelled;

        if let Err(err) = self.executor.close().await {
            warn!(worker = self.id, "Failed to close sink cleanly: {err}");
        }

        info!(
            worker = self.id,
            rows_scanned = source.position(),
            rows_read = outcome.rows_read,
            rows_inserted = outcome.rows_inserted,
            rows_rejected = outcome.rows_rejected,
            batches = outcome.batches_executed,
            aborted = outcome.aborted,
            "Worker finished"
        );
        Ok(outcome)
    }

    async fn submit(&mut self, batch: &Batch, outcome: &mut WorkerOutcome) {
        outcome.batches_executed += 1;
        match self.executor.execute(batch).await {
            WriteOutcome::Written(_) => outcome.rows_inserted += batch.len() as u64,
            WriteOutcome::Failed(failure) => {
                outcome.rows_failed += failure.rows as u64;
                outcome.batch_failures.push(failure);
            }
        }
    }
}
