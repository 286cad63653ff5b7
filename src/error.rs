//! Error types for loading audit input and rendering reports.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading one of the JSON inputs.
#[derive(Error, Debug)]
pub enum InputError {
    /// File or stdin could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input was not the expected JSON shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure producing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
