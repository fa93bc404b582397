//! Streaming bulk-ingestion pipeline: bounded-memory batch assembly,
//! deterministic partitioning across workers, and multi-row writes
//! with retry on transient failures.

pub mod assembler;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod partition;
pub mod retry;
pub mod worker;

pub use config::{ImportConfig, Strategy};
pub use coordinator::{PipelineCoordinator, validate_config};
pub use error::ImportError;
