//! Error types for jobagg

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the jobagg system
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{platform} returned status {status}: {message}")]
    Platform {
        platform: String,
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Reasons a vacancy can be rejected by the validating constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("vacancy title is empty")]
    EmptyTitle,

    #[error("vacancy url is missing")]
    MissingUrl,

    #[error("vacancy url {url} is unreachable, status code {status}")]
    UnreachableUrl { url: String, status: u16 },

    #[error("vacancy url {url} could not be checked: {reason}")]
    UrlCheckFailed { url: String, reason: String },

    #[error("salary is missing, expected {{min, max, currency}}")]
    MissingSalary,

    #[error("salary is incomplete: {0}")]
    IncompleteSalary(String),

    #[error("publication date {0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("vacancy requirements are empty")]
    EmptyRequirements,
}

impl ValidationError {
    /// Name of the vacancy field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle => "title",
            ValidationError::MissingUrl
            | ValidationError::UnreachableUrl { .. }
            | ValidationError::UrlCheckFailed { .. } => "url",
            ValidationError::MissingSalary | ValidationError::IncompleteSalary(_) => "salary",
            ValidationError::InvalidDate(_) => "publication_date",
            ValidationError::EmptyRequirements => "requirements",
        }
    }
}
