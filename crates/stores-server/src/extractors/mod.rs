//! Request extractors

pub mod auth;
pub mod json;

pub use auth::{AuthUser, RefreshUser};
pub use json::ValidatedJson;
