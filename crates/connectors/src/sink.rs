use async_trait::async_trait;
use model::{
    mapping::{ColumnMapping, DestinationSpec},
    records::row::RowData,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Duplicate key, type mismatch or similar destination-side
    /// violation. Soft at batch granularity; never retried.
    #[error("Constraint violation ({code}): {message}")]
    Constraint { code: u16, message: String },

    #[error("Bulk load not supported: {0}")]
    BulkLoadUnsupported(String),

    #[error("Sink error: {0}")]
    Other(String),
}

/// One whole-file load delegated to the destination engine's own
/// ingestion facility, bypassing per-row marshaling.
#[derive(Debug, Clone)]
pub struct BulkLoadRequest {
    pub path: PathBuf,
    pub table: String,
    pub delimiter: char,
    pub mapping: ColumnMapping,
}

/// Destination write seam. Each worker owns exactly one sink for its
/// lifetime; sinks are never shared across workers.
#[async_trait]
pub trait RecordSink: Send {
    /// Writes all rows of one batch as a single multi-row statement
    /// and returns the affected-row count.
    async fn write_batch(
        &mut self,
        spec: &DestinationSpec,
        rows: &[RowData],
    ) -> Result<u64, SinkError>;

    /// Delegates an entire file to the destination's native bulk-load
    /// facility. Sinks without one reject the request.
    async fn bulk_load(&mut self, request: &BulkLoadRequest) -> Result<u64, SinkError> {
        let _ = request;
        Err(SinkError::BulkLoadUnsupported(
            "this sink cannot ingest files directly".to_string(),
        ))
    }

    /// Releases the underlying connection.
    async fn close(&mut self) -> Result<(), SinkError>;
}

/// Opens one owned connection per worker.
#[async_trait]
pub trait SinkConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn RecordSink>, SinkError>;
}
