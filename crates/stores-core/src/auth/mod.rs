//! Token issuance and request authorization
//!
//! Tokens are HS256 JWTs. Every token carries a unique `jti` used as the
//! revocation key and an `is_admin` claim decided at issuance time.

mod gate;
mod token;

pub use gate::AuthGate;
pub use token::{TokenCodec, TokenPolicy};

use serde::{Deserialize, Serialize};

/// Kind of token, carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub fresh: bool,
    pub is_admin: bool,
}

/// Identity of an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub identity: String,
    pub is_admin: bool,
    pub jti: String,
    pub fresh: bool,
}

impl From<Claims> for Caller {
    fn from(c: Claims) -> Self {
        Self {
            identity: c.sub,
            is_admin: c.is_admin,
            jti: c.jti,
            fresh: c.fresh,
        }
    }
}
