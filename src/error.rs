use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeathererError>;

#[derive(Error, Debug)]
pub enum WeathererError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialise database '{path}': {source}")]
    StorageInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Database query error: {0}")]
    StorageQuery(#[source] rusqlite::Error),

    #[error("Input is not valid {encoding} text")]
    ImportDecode { encoding: &'static str },

    #[error("Parse error at line {line}: {message}")]
    ImportParse { line: u64, message: String },

    #[error("Database write error: {0}")]
    ImportWrite(#[source] rusqlite::Error),

    #[error("Observation for area '{area}' at {date} already exists")]
    DuplicateObservation { area: String, date: DateTime<Utc> },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No data for the specified date: {date}")]
    NoData { date: NaiveDate },
}

impl WeathererError {
    pub(crate) fn storage_init(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        WeathererError::StorageInit {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        WeathererError::ImportParse {
            line,
            message: message.into(),
        }
    }
}
