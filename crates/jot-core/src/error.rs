//! Error types for jot-core

use thiserror::Error;

/// Result type alias using jot-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jot-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input rejected, either client-side or by the server
    #[error("{0}")]
    Validation(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the server
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The owning view went away before the call completed.
    ///
    /// Not a user-facing error; controllers drop this outcome silently.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Text shown in a view's error field.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Server {
                status: error.status().map_or(0, |status| status.as_u16()),
                message: format!("invalid response body: {error}"),
            };
        }
        Self::Network(error.to_string())
    }
}
