//! Custom error types for GEOS-Agent
//!
//! Provides a unified error handling system across all modules. Note that
//! tool failures are not represented here: they are folded into
//! [`crate::core::ToolOutcome`] values so the model can see them.

use thiserror::Error;

/// Main error type for GEOS-Agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// Chat completions API errors (connectivity, non-2xx, bad payloads)
    #[error("API error: {0}")]
    Api(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing API key
    #[error("No API key found. Set {0} in the environment or a .env file")]
    MissingApiKey(&'static str),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for GEOS-Agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
