//! valnote Core - Value Model
//!
//! This crate provides the value types shared by the valnote crates:
//! - `Value`, the decoded form of every literal the server can emit
//! - Textual echo of values in wire notation
//! - Projection of values onto JSON for display

pub mod error;
pub mod value;

pub use error::{Error, Result};
pub use value::Value;
