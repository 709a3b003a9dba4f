//! Network error types for the codec and connection.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur while encoding an outbound message.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Failed to encode a message
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that can occur while opening the connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection was already opened once. Each instance connects at
    /// most one time.
    #[error("connection to {url} was already opened")]
    AlreadyOpened { url: String },

    /// The WebSocket handshake failed.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },
}
