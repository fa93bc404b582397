use crate::{
    config::{ImportConfig, Strategy},
    error::ImportError,
    executor::BatchExecutor,
    worker::{ImportWorker, WorkerOutcome},
};
use connectors::{
    file::csv::source::{CsvSource, SourceItem},
    sink::{BulkLoadRequest, SinkConnector},
};
use futures::future::join_all;
use model::{
    mapping::DestinationSpec,
    report::{RunReport, RunStage},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Validates the configuration and the column mapping against a sample
/// row, before any connection is opened or any row is written.
pub fn validate_config(config: &ImportConfig) -> Result<(), ImportError> {
    config.validate()?;

    let mut source = CsvSource::open(&config.source_path, config.delimiter_byte())?;
    match source.next_item()? {
        Some(SourceItem::Row(sample)) => config
            .mapping
            .validate_sample(sample.fields.len())
            .map_err(|err| ImportError::Configuration(err.to_string()))?,
        Some(SourceItem::Rejected { ordinal, reason }) => {
            // The first data row is unreadable; workers will reject it
            // per-row, which is not a configuration problem.
            warn!(ordinal, "Sample row is unreadable: {reason}");
        }
        None => info!("Source file has no data rows"),
    }
    Ok(())
}

/// Wires row source -> (partition filter) -> batch assembler -> bulk
/// insert executor and drives one run through
/// Idle -> Validating -> Running -> Draining -> Completed | Aborted.
pub struct PipelineCoordinator {
    config: ImportConfig,
    connector: Arc<dyn SinkConnector>,
    cancel: CancellationToken,
}

impl PipelineCoordinator {
    pub fn new(
        config: ImportConfig,
        connector: Arc<dyn SinkConnector>,
        cancel: CancellationToken,
    ) -> Self {
        PipelineCoordinator {
            config,
            connector,
            cancel,
        }
    }

    /// Runs the import to completion. Pre-run failures (configuration,
    /// unreadable source, unreachable destination) return `Err`;
    /// anything later still produces a report so partial progress is
    /// detectable.
    pub async fn run(self) -> Result<RunReport, ImportError> {
        let mut report = RunReport::new(self.config.strategy.as_str(), self.config.worker_count);

        report.stage = RunStage::Validating;
        validate_config(&self.config)?;

        match self.config.strategy {
            Strategy::BatchedInsert => self.run_batched(report).await,
            Strategy::NativeBulkLoad => self.run_native(report).await,
        }
    }

    async fn run_batched(self, mut report: RunReport) -> Result<RunReport, ImportError> {
        report.stage = RunStage::Running;
        info!(
            workers = self.config.worker_count,
            batch_size = self.config.max_batch_size,
            "Starting batched import"
        );

        let spec = DestinationSpec::new(&self.config.table, &self.config.mapping);

        // Acquire every sink before any worker starts: a connection
        // failure must not strand half-spawned workers writing rows
        // that no report would account for.
        let mut executors = Vec::with_capacity(self.config.worker_count);
        for _ in 0..self.config.worker_count {
            match self.connector.connect().await {
                Ok(sink) => executors.push(BatchExecutor::new(
                    sink,
                    spec.clone(),
                    self.config.retry_policy(),
                )),
                Err(err) => {
                    for mut executor in executors {
                        if let Err(close_err) = executor.close().await {
                            warn!("Failed to close sink cleanly: {close_err}");
                        }
                    }
                    return Err(err.into());
                }
            }
        }

        let mut handles = Vec::with_capacity(self.config.worker_count);
        for (id, executor) in executors.into_iter().enumerate() {
            let worker = ImportWorker::new(id, self.config.clone(), executor, self.cancel.clone());
            handles.push(tokio::spawn(worker.run()));
        }

        report.stage = RunStage::Draining;
        let mut aborted = false;
        for joined in join_all(handles).await {
            match joined {
                Ok(Ok(outcome)) => {
                    aborted |= outcome.aborted;
                    merge_outcome(&mut report, outcome);
                }
                Ok(Err(err)) => {
                    error!("Worker failed: {err}");
                    report.fatal = Some(err.to_string());
                    aborted = true;
                }
                Err(join_err) => {
                    error!("Worker task join failed: {join_err}");
                    report.fatal = Some(join_err.to_string());
                    aborted = true;
                }
            }
        }

        // Deterministic order regardless of worker interleaving.
        report.batch_failures.sort_by_key(|f| (f.worker_id, f.seq));
        report.rejected_rows.sort_by_key(|r| r.ordinal);

        let stage = if aborted {
            RunStage::Aborted
        } else {
            RunStage::Completed
        };
        Ok(report.finalize(stage))
    }

    async fn run_native(self, mut report: RunReport) -> Result<RunReport, ImportError> {
        report.stage = RunStage::Running;

        if !self.config.mapping.constants.is_empty() {
            let columns = self
                .config
                .mapping
                .constants
                .iter()
                .map(|c| c.column.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            // The destination applies these verbatim to every row; any
            // per-row computed default is lost on this path.
            warn!(columns = %columns, "Native bulk load applies constant values to every row");
        }

        let request = BulkLoadRequest {
            path: self.config.source_path.clone(),
            table: self.config.table.clone(),
            delimiter: self.config.delimiter,
            mapping: self.config.mapping.clone(),
        };

        let mut sink = self.connector.connect().await?;
        let result = sink.bulk_load(&request).await;
        if let Err(err) = sink.close().await {
            warn!("Failed to close sink cleanly: {err}");
        }

        match result {
            Ok(loaded) => {
                info!(rows = loaded, "Native bulk load finished");
                report.rows_read = loaded;
                report.rows_inserted = loaded;
                Ok(report.finalize(RunStage::Completed))
            }
            Err(err) => {
                error!("Native bulk load failed: {err}");
                report.fatal = Some(err.to_string());
                Ok(report.finalize(RunStage::Aborted))
            }
        }
    }
}

fn merge_outcome(report: &mut RunReport, outcome: WorkerOutcome) {
    report.rows_read += outcome.rows_read;
    report.rows_inserted += outcome.rows_inserted;
    report.rows_rejected += outcome.rows_rejected;
    report.rows_failed += outcome.rows_failed;
    report.batches_executed += outcome.batches_executed;
    report.rejected_rows.extend(outcome.rejected_rows);
    report.batch_failures.extend(outcome.batch_failures);
}
