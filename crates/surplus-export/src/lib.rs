//! Local artifacts and spreadsheet delivery for cleaned auction runs.

pub mod files;
pub mod sheet;

pub use files::{ExportPaths, ResultsDir};
pub use sheet::{SheetClient, SheetPayload, SheetRow};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet endpoint returned HTTP {status}: {body}")]
    SheetRejected { status: u16, body: String },
}
