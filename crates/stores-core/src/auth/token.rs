//! JWT encoding and decoding

use super::{Claims, TokenType};
use crate::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Lifetimes and the admin rule applied when issuing tokens
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub admin_identity: String,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(30),
            admin_identity: "1".to_string(),
        }
    }
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    policy: TokenPolicy,
}

impl TokenCodec {
    pub fn new(secret: &str, policy: TokenPolicy) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// The admin claim: only the designated admin identity gets it
    pub fn is_admin(&self, identity: &str) -> bool {
        identity == self.policy.admin_identity
    }

    /// Build a fresh set of claims with a new jti
    pub fn claims_for(&self, identity: &str, token_type: TokenType, fresh: bool) -> Claims {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.policy.access_ttl,
            TokenType::Refresh => self.policy.refresh_ttl,
        };

        Claims {
            sub: identity.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type,
            fresh,
            is_admin: self.is_admin(identity),
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn issue(
        &self,
        identity: &str,
        token_type: TokenType,
        fresh: bool,
    ) -> Result<String, AuthError> {
        self.encode(&self.claims_for(identity, token_type, fresh))
    }

    /// Verify signature and expiry, classifying failures
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }
}
