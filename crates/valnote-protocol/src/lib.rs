//! Value notation protocol
//!
//! Decoder for the line-delimited responses of a remote interpreter server.
//!
//! ## Response Format
//! ```text
//! null                       # Null
//! true | false               # Boolean
//! 'c'                        # Character
//! -42                        # Integer
//! 10.99                      # Float
//! "knuckle\"ball"            # String
//! [1,2,3]                    # Vector
//! {1,2,3}                    # Set
//! (("a",1),("b",2))          # Dictionary
//! (1,2)                      # Tuple
//! SyntaxError: <message>     # Error (also RuntimeError:, AuthenticationError:)
//! ```
//!
//! Inside composites, bare names such as `prices` or `std::ages` are
//! variable references and decode as symbols.

pub mod decoder;
pub mod error;
pub mod framing;
mod grammar;

pub use decoder::decode;
pub use error::{DecodeError, DecodeResult, FrameError};
pub use framing::LineFramer;
