use engine::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the configuration file: {0}")]
    ConfigFileRead(#[from] std::io::Error),

    #[error("Failed to parse the configuration file as JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Failed to serialize report to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("Destination error: {0}")]
    Sink(#[from] connectors::sink::SinkError),
}
