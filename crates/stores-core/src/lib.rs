//! Stores Core Library
//!
//! Error taxonomy, token handling and port traits for the Stores API.

// Re-export pure types from stores-types
pub use stores_types::*;

#[cfg(feature = "jwt")]
pub mod auth;
pub mod error;
pub mod ports;

#[cfg(feature = "jwt")]
pub use auth::{AuthGate, Caller, Claims, TokenCodec, TokenPolicy, TokenType};
pub use error::{AuthError, Result, ServiceError};
