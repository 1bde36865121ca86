//! Progress message types
//!
//! The closed set of status messages a job can push to its observers. The
//! `type` discriminator is part of the wire contract with the frontend:
//! any number of `log`/`progress` messages, then exactly one `complete` or
//! `error`.

use serde::{Deserialize, Serialize};

/// A status event pushed to observers of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressMessage {
    Log {
        message: String,
    },
    Progress {
        message: String,
        processed: u64,
        total: u64,
        percentage: u8,
    },
    Error {
        message: String,
    },
    Complete {
        message: String,
        processed: u64,
        total: u64,
    },
}

impl ProgressMessage {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    pub fn progress(processed: u64, total: u64) -> Self {
        Self::Progress {
            message: format!("Processed {processed} of {total} rows"),
            processed,
            total,
            percentage: percentage(processed, total),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn complete(processed: u64, total: u64) -> Self {
        Self::Complete {
            message: "Processing complete".to_string(),
            processed,
            total,
        }
    }

    /// Whether this message terminates a job's stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Complete { .. })
    }
}

/// Integer percentage, floored; 0 when `total` is 0
pub fn percentage(processed: u64, total: u64) -> u8 {
    if total == 0 {
        0
    } else {
        (processed * 100 / total) as u8
    }
}
