//! Upload pipeline error taxonomy.
//!
//! Input-format and mapping errors abort the current stage; row-validation
//! errors live in the per-row report instead (see `types::upload`). Payload
//! and transport errors leave the normalized batch intact for resubmission.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// File extension is not one of .csv / .xls / .xlsx.
    #[error("unsupported file type '{0}', expected .csv, .xls or .xlsx")]
    UnsupportedExtension(String),

    /// The file could not be parsed (corrupt content, unreadable encoding).
    #[error("failed to parse file: {0}")]
    Parse(String),

    /// The file parsed but produced zero data rows.
    #[error("no rows detected in file")]
    NoRows,

    /// Required canonical fields are not mapped to any column.
    #[error("required fields not mapped: {0}")]
    MappingIncomplete(String),

    /// Called a stage out of order (no parsed file / no confirmed mapping).
    #[error("{0}")]
    InvalidState(&'static str),

    /// One or more rows still carry validation errors; the batch is blocked.
    #[error("{invalid} row(s) have validation errors, fix them before submitting")]
    RowsInvalid { invalid: usize },

    /// Client-side payload size gate tripped before the request was sent.
    #[error("payload is {actual} bytes, exceeding the {max} byte limit, split your upload")]
    PayloadTooLarge { actual: usize, max: usize },

    /// The server rejected the request body as too large (HTTP 413).
    #[error("server rejected the payload as too large, split your upload and retry")]
    PayloadRejectedByServer,

    /// Non-2xx response with the most specific message available.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write credentials file: {0}")]
    CredentialExport(String),
}

impl From<csv::Error> for UploadError {
    fn from(err: csv::Error) -> Self {
        UploadError::Parse(err.to_string())
    }
}
