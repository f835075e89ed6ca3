//! Transport error types

use std::time::Duration;

use thiserror::Error;
use valnote_protocol::{DecodeError, FrameError};

/// Failures while talking to the server
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Unable to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to connect to {0}")]
    Unreachable(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection closed by foreign host")]
    ConnectionClosed,

    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors returned by [`Client`](crate::Client) operations
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Whether the connection is unusable after this error.
    ///
    /// An oversized response counts: its tail is still in flight and would be
    /// read as the answer to the next request.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(
                TransportError::ConnectionClosed
                    | TransportError::Io(_)
                    | TransportError::Timeout(_)
                    | TransportError::Frame(FrameError::MessageTooLarge { .. })
            )
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
