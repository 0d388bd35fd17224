//! Domain error types

use thiserror::Error;

/// Which piece of API configuration is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ApiKey,
    ApiUrl,
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigField::ApiKey => write!(f, "API key"),
            ConfigField::ApiUrl => write!(f, "API request URL"),
        }
    }
}

/// Sub-kind of an upstream HTTP failure, derived from the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Other,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            403 => HttpErrorKind::Forbidden,
            404 => HttpErrorKind::NotFound,
            _ => HttpErrorKind::Other,
        }
    }
}

/// Everything that can end an explanation request without text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    #[error("Configuration missing: {field}")]
    ConfigurationMissing { field: ConfigField },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Upstream HTTP error: status {status}")]
    UpstreamHttp { status: u16, kind: HttpErrorKind },

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Empty response: no candidates returned")]
    EmptyResponse,

    #[error("Malformed response: no usable text")]
    MalformedResponse,

    #[error("Operation cancelled")]
    Cancelled,
}

impl ExplainError {
    /// Build an HTTP error, classifying the status code.
    pub fn http(status: u16) -> Self {
        ExplainError::UpstreamHttp {
            status,
            kind: HttpErrorKind::from_status(status),
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExplainError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExplainError::Timeout)
    }

    /// The message shown to the user in the error panel.
    ///
    /// Every variant (and every HTTP sub-kind) maps to its own text so the
    /// user can tell what to fix.
    pub fn user_message(&self) -> String {
        match self {
            ExplainError::ConfigurationMissing { field } => format!(
                "The {} is not configured. Open the settings and enter it before requesting an explanation.",
                field
            ),
            ExplainError::Transport(detail) => {
                format!("Could not reach the explanation service: {}", detail)
            }
            ExplainError::Timeout => {
                "The explanation request timed out. Please try again.".to_string()
            }
            ExplainError::UpstreamHttp { status, kind } => match kind {
                HttpErrorKind::BadRequest => format!(
                    "The API rejected the request as invalid (HTTP {}). Check the request URL and model name.",
                    status
                ),
                HttpErrorKind::Unauthorized => format!(
                    "Authentication failed (HTTP {}). The API key is invalid or expired.",
                    status
                ),
                HttpErrorKind::Forbidden => format!(
                    "Access denied (HTTP {}). The API key does not have permission to use this model.",
                    status
                ),
                HttpErrorKind::NotFound => format!(
                    "The API endpoint was not found (HTTP {}). Check the request URL.",
                    status
                ),
                HttpErrorKind::Other => {
                    format!("The API returned an error (HTTP {}).", status)
                }
            },
            ExplainError::ContentFiltered(reason) => format!(
                "The response was blocked by the safety filter (reason: {}).",
                reason
            ),
            ExplainError::EmptyResponse => {
                "The API returned no candidates for this text.".to_string()
            }
            ExplainError::MalformedResponse => {
                "The API response did not contain any explanation text.".to_string()
            }
            ExplainError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}
