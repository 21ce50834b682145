//! Custom error types for CRAITE
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for CRAITE operations
#[derive(Error, Debug)]
pub enum CraiteError {
    /// Bad or missing provider settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No API key available for a provider that needs one
    #[error("No API key configured for provider '{provider}'. Set CRAITE_API_KEY or add api_key to the config file")]
    MissingCredential { provider: String },

    /// Request parameters outside their accepted range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream call could not be made (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream API answered with a non-success status
    #[error("Upstream API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The upstream response did not contain the expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The caller cancelled the operation before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for CRAITE operations
pub type Result<T> = std::result::Result<T, CraiteError>;

impl CraiteError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a missing credential error
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::MissingCredential { .. } => "missing_credential",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Transport(_) => "transport",
            Self::Upstream { .. } => "upstream",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Cancelled => "cancelled",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }

    /// Whether a caller-side retry policy may reasonably retry this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
