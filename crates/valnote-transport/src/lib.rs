//! valnote Transport Layer
//!
//! Provides the client side of a valnote server connection:
//! - Connection: TCP stream framed into `\n`-terminated responses
//! - Client: authenticated request/response session returning decoded values
//! - ClientConfig: connection settings, loadable from a config file

pub mod client;
pub mod config;
pub mod connection;
pub mod error;

pub use client::Client;
pub use config::ClientConfig;
pub use connection::Connection;
pub use error::{ClientError, ClientResult, TransportError, TransportResult};
