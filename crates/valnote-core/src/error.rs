//! Error types for valnote Core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: &'static str },

    #[error("Float is not representable in notation: {0}")]
    NonFiniteFloat(f64),
}

/// Result type alias for valnote Core operations
pub type Result<T> = std::result::Result<T, Error>;
