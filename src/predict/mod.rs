//! Prediction services: what gets uploaded, what comes back, how it renders.
//!
//! Each service is described by a [`PredictionKind`]. The upload itself is
//! shared (see [`crate::workflow::UploadPage`]); only the endpoint, the
//! response shape and the renderer differ between kinds.

pub mod client;
pub mod error;
pub mod leakage;
pub mod mock;
pub mod pilferage;
pub mod quality;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub use client::{HttpPredictor, Predictor};
pub use error::{ErrorKind, PredictError};
pub use leakage::Leakage;
pub use pilferage::Pilferage;
pub use quality::WaterQuality;

use crate::consts::{CSV_MIME, UPLOAD_FIELD};
use crate::theme::Palette;

/// Where a page sends its uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    /// Multipart field the service reads the file from.
    pub field: &'static str,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            field: UPLOAD_FIELD,
        }
    }
}

/// A file packaged for one submission. Built at submit time, never stored.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

impl UploadRequest {
    /// Read the file at `path` into memory.
    pub async fn read(path: &Path) -> Result<Self, PredictError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PredictError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self {
            bytes,
            filename,
            mime_type: CSV_MIME,
        })
    }
}

/// A modal shown on top of a rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    /// Boxed rendering, sized to the longer of title and message.
    pub fn render(&self, palette: &Palette) -> String {
        let width = self.title.chars().count().max(self.message.chars().count()) + 4;
        let bar = "═".repeat(width);
        let pad = |s: &str| format!("{s:<w$}", w = width - 4);
        let mut out = String::new();
        out.push_str(&format!("╔{bar}╗\n"));
        out.push_str(&format!("║  {}  ║\n", palette.danger(&pad(&self.title))));
        out.push_str(&format!("║  {}  ║\n", pad(&self.message)));
        out.push_str(&format!("╚{bar}╝\n"));
        out
    }
}

/// Turns a decoded result into terminal output.
pub trait Render {
    fn render(&self, palette: &Palette) -> String;

    /// A modal to raise for this result, if any.
    fn alert(&self) -> Option<Alert> {
        None
    }
}

/// One prediction service and the shape of its answer.
pub trait PredictionKind: Send + Sync + 'static {
    /// Short name used for commands and logs.
    const NAME: &'static str;
    /// Page heading.
    const TITLE: &'static str;
    /// Label of the submit action.
    const ACTION: &'static str;
    /// Extension filter of the file input, if the page declares one.
    const ACCEPT: Option<&'static str>;

    type Output: DeserializeOwned + Render + Clone + Send + Sync + 'static;
}

/// Normalise a user-supplied path (trims quotes a shell would have removed).
pub fn clean_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches(|c| c == '"' || c == '\''))
}
