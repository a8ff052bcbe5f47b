//! Error types for the Stores API

use stores_types::FieldErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures surfaced by the resource services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("A {entity} with that name already exists")]
    DuplicateName { entity: &'static str },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Could not delete the tag. Make sure it is not associated with any item")]
    TagInUse,

    #[error("Item and tag should belong to the same store")]
    CrossStoreLink,

    #[error("Item and tag should be linked before attempting to unlink")]
    LinkNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] FieldErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn duplicate(entity: &'static str) -> Self {
        ServiceError::DuplicateName { entity }
    }
}

/// Failures raised by the authorization gate
///
/// Every variant except `Storage` is a client-side token problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("The token has expired")]
    TokenExpired,

    #[error("Signature verification failed: {0}")]
    TokenInvalid(String),

    #[error("Request does not contain an access token")]
    TokenMissing,

    #[error("The token has been revoked")]
    TokenRevoked,

    #[error("Could not sign token: {0}")]
    Signing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Stable machine-readable code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenInvalid(_) => "invalid_token",
            AuthError::TokenMissing => "authorization_required",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::Signing(_) | AuthError::Storage(_) => "internal_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Signing(_) | AuthError::Storage(_))
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}
