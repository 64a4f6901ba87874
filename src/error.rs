//! Error types for the Decoy client engine.

use thiserror::Error;

use crate::error_codes::ApiErrorCode;

/// Errors that can occur when using the Decoy client engine.
#[derive(Debug, Error)]
pub enum DecoyError {
    /// Failed to send a message through the push channel.
    #[error("channel send error: {0}")]
    ChannelSend(String),

    /// Failed to receive a message from the push channel.
    #[error("channel receive error: {0}")]
    ChannelReceive(String),

    /// The push channel connection was closed unexpectedly.
    #[error("push channel closed")]
    ChannelClosed,

    /// Failed to serialize or deserialize a wire message.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Attempted an operation on a session that has already shut down.
    #[error("session is not running")]
    NotRunning,

    /// The game server rejected a request.
    ///
    /// The message is surfaced verbatim so the UI can show exactly what the
    /// server said (e.g. "only the question master can pick a question").
    #[error("server error: {message}")]
    Server {
        /// Human-readable rejection message from the server.
        message: String,
        /// Structured error code, if provided by the server.
        code: Option<ApiErrorCode>,
    },

    /// An HTTP transport failure on a snapshot or action request.
    #[cfg(feature = "api-http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// An operation timed out.
    #[error("operation timed out")]
    Timeout,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for Decoy client operations.
pub type Result<T> = std::result::Result<T, DecoyError>;
