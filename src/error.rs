// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names one failure mode of an export run. Everything here is
//! fatal: the exporter has no partial-success mode, so a returned error
//! unwinds the whole walk. Degraded rendering (unknown blocks, missing titles,
//! empty properties) is not an error and never reaches this type.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] crate::types::ValidationError),

    #[error("Fetch failed with status {status}: {message}")]
    FetchFailed { status: u16, message: String },

    #[error("Too many redirects ({hops}) while fetching {url}")]
    RedirectLoop { url: String, hops: usize },

    #[error("Path {} is not reachable from {}", path.display(), base.display())]
    PathOutsideBase { path: PathBuf, base: PathBuf },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({status} {code}): {message}")]
    NotionApi {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Maximum recursion depth ({0}) exceeded")]
    RecursionLimitExceeded(usize),
}

impl AppError {
    /// Builds a `FetchFailed` from an HTTP status and a short reason.
    pub fn fetch_failed(status: u16, message: impl Into<String>) -> Self {
        AppError::FetchFailed {
            status,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::MalformedResponse(format!("Formatting error: {}", err))
    }
}
