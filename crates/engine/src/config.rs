use crate::{error::ImportError, retry::RetryPolicy};
use connectors::mysql::query::MYSQL_MAX_PLACEHOLDERS;
use model::mapping::ColumnMapping;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// How rows reach the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One multi-row INSERT per batch, optionally across workers.
    BatchedInsert,
    /// Delegate the whole file to the destination's bulk-load facility.
    NativeBulkLoad,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BatchedInsert => "batched-insert",
            Strategy::NativeBulkLoad => "native-bulk-load",
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_batch_size() -> usize {
    1000
}

fn default_worker_count() -> usize {
    1
}

fn default_strategy() -> Strategy {
    Strategy::BatchedInsert
}

fn default_max_retries() -> usize {
    3
}

fn default_backoff_ms() -> u64 {
    200
}

/// Configuration surface of one import run.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub source_path: PathBuf,
    pub destination_url: String,
    pub table: String,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_strategy")]
    pub strategy: Strategy,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_backoff_ms")]
    pub retry_backoff_ms: u64,

    pub mapping: ColumnMapping,
}

impl ImportConfig {
    /// Fails fast on an invalid option combination, before any row is
    /// processed or any connection is opened.
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.table.is_empty() {
            return Err(ImportError::Configuration(
                "destination table must not be empty".to_string(),
            ));
        }
        if self.mapping.bindings.is_empty() {
            return Err(ImportError::Configuration(
                "column mapping must bind at least one source field".to_string(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(ImportError::Configuration(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(ImportError::Configuration(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(ImportError::Configuration(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }

        // The destination caps placeholders per statement; refuse a
        // batch/mapping combination that would exceed it instead of
        // silently truncating.
        let placeholders = self.max_batch_size * self.mapping.field_width();
        if placeholders > MYSQL_MAX_PLACEHOLDERS {
            return Err(ImportError::Configuration(format!(
                "max_batch_size {} x {} columns = {} placeholders exceeds the destination limit of {}",
                self.max_batch_size,
                self.mapping.field_width(),
                placeholders,
                MYSQL_MAX_PLACEHOLDERS
            )));
        }

        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries + 1,
            Duration::from_millis(self.retry_backoff_ms),
            Duration::from_secs(5),
        )
    }
}
