use crate::retry::{RetryDisposition, RetryPolicy, classify_sink_error};
use connectors::sink::{RecordSink, SinkError};
use model::{
    mapping::DestinationSpec,
    records::batch::Batch,
    report::{BatchFailure, FailureKind},
};
use std::time::Instant;
use tokio::time::sleep;
use tracing::{info, warn};

/// Result of one batch write attempt chain.
#[derive(Debug)]
pub enum WriteOutcome {
    Written(u64),
    /// The write ultimately failed; the batch's row range is recorded
    /// and sibling batches continue.
    Failed(BatchFailure),
}

/// Turns one batch into exactly one multi-row write operation against
/// the destination, retrying transient failures with backoff.
pub struct BatchExecutor {
    sink: Box<dyn RecordSink>,
    spec: DestinationSpec,
    retry: RetryPolicy,
}

impl BatchExecutor {
    pub fn new(sink: Box<dyn RecordSink>, spec: DestinationSpec, retry: RetryPolicy) -> Self {
        BatchExecutor { sink, spec, retry }
    }

    pub async fn execute(&mut self, batch: &Batch) -> WriteOutcome {
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            match self.sink.write_batch(&self.spec, &batch.rows).await {
                Ok(rows_affected) => {
                    let duration = start.elapsed();
                    let rows_per_sec = batch.len() as f64 / duration.as_secs_f64().max(1e-9);
                    info!(
                        worker = batch.worker_id,
                        seq = batch.seq,
                        rows = batch.len(),
                        duration_ms = duration.as_millis() as u64,
                        rows_per_sec = %format!("{rows_per_sec:.2}"),
                        "Batch written"
                    );
                    return WriteOutcome::Written(rows_affected);
                }
                Err(err) => match classify_sink_error(&err) {
                    RetryDisposition::Stop => {
                        warn!(
                            worker = batch.worker_id,
                            seq = batch.seq,
                            "Batch write failed: {err}"
                        );
                        return WriteOutcome::Failed(failure_for(batch, &err, false));
                    }
                    RetryDisposition::Retry => {
                        if attempt + 1 >= self.retry.max_attempts {
                            warn!(
                                worker = batch.worker_id,
                                seq = batch.seq,
                                attempts = self.retry.max_attempts,
                                "Retry budget exhausted: {err}"
                            );
                            return WriteOutcome::Failed(failure_for(batch, &err, true));
                        }

                        let delay = self.retry.backoff_delay(attempt);
                        warn!(
                            worker = batch.worker_id,
                            seq = batch.seq,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "Transient write failure, retrying: {err}"
                        );
                        sleep(delay).await;
                        attempt += 1;
                    }
                },
            }
        }
    }

    pub async fn close(&mut self) -> Result<(), SinkError> {
        self.sink.close().await
    }
}

fn failure_for(batch: &Batch, err: &SinkError, retries_exhausted: bool) -> BatchFailure {
    let kind = if retries_exhausted {
        FailureKind::RetriesExhausted
    } else if matches!(err, SinkError::Constraint { .. }) {
        FailureKind::Constraint
    } else {
        FailureKind::Other
    };

    BatchFailure {
        worker_id: batch.worker_id,
        seq: batch.seq,
        first_ordinal: batch.first_ordinal(),
        last_ordinal: batch.last_ordinal(),
        rows: batch.len(),
        kind,
        message: err.to_string(),
    }
}
