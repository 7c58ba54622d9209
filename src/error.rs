use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can end a user action (upload, process, plot).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Select at least one spectrum file to upload")]
    NoFilesSelected,

    #[error("No data uploaded yet; upload a file first")]
    NoDataset,

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{endpoint} failed with HTTP {status}: {reason}")]
    Http {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },

    #[error("Could not reach the processing server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected server response: {0}")]
    Contract(String),

    #[error("Server reported an error: {0}")]
    Server(String),

    #[error("Could not build chart: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse category of a [`ClientError`], used to title user notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Contract,
    Render,
}

impl ErrorKind {
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Validation => "Check your input",
            ErrorKind::Transport => "Server request failed",
            ErrorKind::Contract => "Unexpected server response",
            ErrorKind::Render => "Plotting failed",
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NoFilesSelected | ClientError::NoDataset | ClientError::FileRead { .. } => {
                ErrorKind::Validation
            }
            ClientError::Http { .. } | ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Contract(_) | ClientError::Server(_) | ClientError::Json(_) => {
                ErrorKind::Contract
            }
            ClientError::Render(_) => ErrorKind::Render,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
