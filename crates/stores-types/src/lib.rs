//! Stores Types - Pure type definitions
//!
//! Entities, request payloads and response views shared by the service
//! and HTTP layers. No runtime or storage dependencies live here.

pub mod item;
pub mod store;
pub mod tag;
pub mod user;
pub mod validation;

pub use item::*;
pub use store::*;
pub use tag::*;
pub use user::*;
pub use validation::{FieldError, FieldErrors, Validate};

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
