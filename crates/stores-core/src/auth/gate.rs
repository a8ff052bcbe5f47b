//! Authorization gate

use super::{Caller, TokenCodec, TokenType};
use crate::error::AuthError;
use crate::ports::RevocationStore;
use std::sync::Arc;

/// Checks bearer tokens: signature, expiry, token type, then revocation
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocations }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authorize a raw `Authorization` header value
    pub async fn authorize(
        &self,
        header: Option<&str>,
        expected: TokenType,
    ) -> Result<Caller, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenMissing)?;

        self.authorize_token(token, expected).await
    }

    pub async fn authorize_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Caller, AuthError> {
        let claims = self.codec.decode(token)?;

        if claims.token_type != expected {
            return Err(AuthError::TokenInvalid(format!(
                "Only {} tokens are allowed",
                expected
            )));
        }

        let revoked = self
            .revocations
            .is_revoked(&claims.jti)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        if revoked {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims.into())
    }
}
