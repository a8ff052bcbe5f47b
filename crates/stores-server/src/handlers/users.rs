//! Account and token handlers

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, RefreshUser, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stores_types::{AccessToken, AuthTokens, CredentialsRequest, Message, User};

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    state.users.register(credentials).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("User created successfully.")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<CredentialsRequest>,
) -> ApiResult<Json<AuthTokens>> {
    Ok(Json(state.users.login(credentials).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(caller): RefreshUser,
) -> ApiResult<Json<AccessToken>> {
    Ok(Json(state.users.refresh(&caller).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Message>> {
    state.users.logout(&caller).await?;
    Ok(Json(Message::new("Successfully logged out.")))
}

pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.get_user(user_id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Message>> {
    state.users.delete_user(user_id).await?;
    Ok(Json(Message::new("User deleted.")))
}
