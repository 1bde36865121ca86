//! Ingestion error taxonomy
//!
//! Every variant is job-fatal: the pipeline maps the first error it observes
//! to exactly one terminal `error` progress message. Observers only ever see
//! `user_message()`; the full error goes to the operational log.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("uploaded artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("source stream is not decodable: {0}")]
    InputFormat(String),

    #[error("catalog header is missing required columns: {0}")]
    Schema(String),

    #[error("malformed catalog row: {0}")]
    Parse(String),

    #[error("batch upsert failed: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("unexpected failure: {0}")]
    Internal(String),
}

impl IngestError {
    /// Sanitized description safe to push to progress observers.
    ///
    /// Never contains raw internal error text.
    pub fn user_message(&self) -> String {
        match self {
            IngestError::ArtifactMissing(_) => "Uploaded file could not be found.".to_string(),
            IngestError::InputFormat(_) => {
                "Invalid file format. The file must be a valid gzip-compressed CSV.".to_string()
            },
            IngestError::Schema(missing) => {
                format!("CSV file is missing required columns: {missing}.")
            },
            IngestError::Parse(_) => "CSV file format is invalid or cannot be parsed.".to_string(),
            IngestError::Persistence(_) => "Database error occurred during processing.".to_string(),
            IngestError::Internal(_) => {
                "An unexpected error occurred during processing.".to_string()
            },
        }
    }
}
