//! Error types for the prediction-upload workflow.

use std::path::PathBuf;

/// Generic text shown for every failure past validation.
pub const GENERIC_FAILURE: &str = "An error occurred while processing the file";

/// Coarse classification of a [`PredictError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caught before any I/O against the service.
    Validation,
    /// The request never produced an HTTP response.
    Transport,
    /// The service answered with a non-success status.
    Server,
    /// The response body was not the expected JSON.
    Decode,
}

/// Errors that can occur while submitting a file for prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Submit was pressed with nothing selected.
    #[error("no file selected")]
    NoFileSelected,

    /// The selected file does not match the page's extension filter.
    #[error("{} is not a .{extension} file", .path.display())]
    UnsupportedFile {
        /// Path that was offered.
        path: PathBuf,
        /// Extension the page accepts.
        extension: &'static str,
    },

    /// The selected file could not be read at submit time.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, TLS or timeout failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("{url} responded {status} {reason}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server {
        url: String,
        status: u16,
        reason: String,
        /// `error` field of a JSON error body, when present.
        detail: Option<String>,
    },

    /// Body was not JSON, or not the shape this page expects.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::NoFileSelected
            | PredictError::UnsupportedFile { .. }
            | PredictError::Read { .. } => ErrorKind::Validation,
            PredictError::Transport { .. } => ErrorKind::Transport,
            PredictError::Server { .. } => ErrorKind::Server,
            PredictError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The free-text alert shown to the user. Details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::NoFileSelected => "Please select a file".to_string(),
            PredictError::UnsupportedFile { extension, .. } => {
                format!("Please select a .{extension} file")
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
