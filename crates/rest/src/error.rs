//! Error types for the Parse REST layer.

use thiserror::Error;

/// Failures raised by the Parse REST client.
#[derive(Debug, Error)]
pub enum ParseRestError {
    /// Configuration errors (missing base URL, app id, or credentials).
    /// These are fatal at startup; they never occur per-request.
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream Parse Server responded with a non-2xx status.
    /// Carries the status code and the raw response body, unmodified.
    #[error("parse server error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failures (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body was not valid JSON.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ParseRestError>;

impl From<reqwest::Error> for ParseRestError {
    fn from(value: reqwest::Error) -> Self {
        // Strip the URL from the message; paths can embed object ids.
        Self::Transport(value.without_url().to_string())
    }
}

impl ParseRestError {
    /// Status code for upstream failures, `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
