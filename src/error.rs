use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that abort the whole run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("environment variable `{0}` is not set or empty")]
    MissingVariable(&'static str),
    #[error("invalid DBPORT `{value}`: {reason}")]
    InvalidPort { value: String, reason: String },
    #[error("failed to read CSV header, reason: `{0}`")]
    Header(#[source] csv::Error),
    #[error("CSV header declares {0} column(s), at least 2 are required")]
    HeaderTooShort(usize),
    #[error("failed to download s3://{bucket}/{key}: {reason}")]
    ObjectFetch {
        bucket: String,
        key: String,
        reason: String,
    },
    #[error("failed to open log file `{}`: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write log: {0}")]
    LogWrite(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Per-row failures. These are logged and processing moves on to the next row.
///
/// The `Display` output is what follows `Row <n>: ` in the error log.
#[derive(Error, Debug, PartialEq)]
pub enum RowError {
    #[error("Malformed CSV record: {0}")]
    Malformed(String),
    #[error("Empty transaction_id")]
    EmptyId,
    #[error("Invalid datetime for ID {id}: '{raw}'")]
    InvalidDatetime { id: String, raw: String },
    #[error(
        "DB update failed for transaction_id {id} for transaction_datetime {datetime}: No record found for ID {id}"
    )]
    NotFound { id: String, datetime: NaiveDateTime },
    #[error(
        "DB update failed for transaction_id {id} for transaction_datetime {datetime}: {reason}"
    )]
    WriteFailure {
        id: String,
        datetime: NaiveDateTime,
        reason: String,
    },
}
