//! Protocol error types

use thiserror::Error;

/// Failure to turn a response into a value
///
/// The first three variants are errors reported by the server; the message
/// is the full response text, tag included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{0}")]
    SyntaxError(String),

    #[error("{0}")]
    RuntimeError(String),

    #[error("{0}")]
    AuthenticationError(String),

    #[error("invalid value: {0:?}")]
    MalformedLiteral(String),
}

impl DecodeError {
    /// Whether the server itself reported the error
    pub fn is_server_error(&self) -> bool {
        !matches!(self, DecodeError::MalformedLiteral(_))
    }

    /// Text carried by the error
    pub fn message(&self) -> &str {
        match self {
            DecodeError::SyntaxError(m)
            | DecodeError::RuntimeError(m)
            | DecodeError::AuthenticationError(m)
            | DecodeError::MalformedLiteral(m) => m,
        }
    }
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Response framing errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Message too large: {size} > {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Response is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
