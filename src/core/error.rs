//! Custom error types for Duologue
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Duologue operations
#[derive(Error, Debug)]
pub enum DuologueError {
    /// A required secret was not supplied at startup
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// Configuration errors (bad file, template or endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion service rejected the credential
    #[error("Authentication failed for {provider}")]
    AuthFailed { provider: String },

    /// The completion service asked us to slow down
    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    /// Non-success response from the completion service
    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    /// Response body did not have the expected shape
    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Duologue operations
pub type Result<T> = std::result::Result<T, DuologueError>;

impl DuologueError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing-credential error for the named variable
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential(name.into())
    }

    /// Whether the error happened before any turn could run
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::MissingCredential(_) | Self::Config(_))
    }
}
