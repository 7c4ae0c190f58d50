// Error types for ghcal.
// Covers calendar fetching, cache store access, and contribution parsing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Calendar data not found after {attempts} attempts")]
    CalendarNotFound { attempts: u32 },

    #[error("Malformed contribution day: {0}")]
    MalformedDay(String),

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
