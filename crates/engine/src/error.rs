use connectors::{file::csv::error::FileError, sink::SinkError};
use thiserror::Error;

/// Top-level errors for the import engine.
///
/// Soft failures (rejected rows, failed batches) never surface here;
/// they are recorded in the run report. Everything below is fatal to
/// the worker that raises it.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Mapping/placeholder-limit mismatch or invalid option, surfaced
    /// before any row is processed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// A worker task was cancelled or panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
