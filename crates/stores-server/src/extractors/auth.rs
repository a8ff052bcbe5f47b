//! Bearer token extractors for protected routes

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use stores_core::{Caller, TokenType};

/// Caller holding a valid, unrevoked access token
#[derive(Clone, Debug)]
pub struct AuthUser(pub Caller);

/// Caller holding a valid, unrevoked refresh token
#[derive(Clone, Debug)]
pub struct RefreshUser(pub Caller);

async fn authorize(
    parts: &Parts,
    state: &AppState,
    expected: TokenType,
) -> Result<Caller, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    Ok(state.gate.authorize(header, expected).await?)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, TokenType::Access).await.map(AuthUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, TokenType::Refresh)
            .await
            .map(RefreshUser)
    }
}
