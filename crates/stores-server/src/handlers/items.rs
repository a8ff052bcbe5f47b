//! Item handlers

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stores_types::{CreateItemRequest, ItemView, ReplaceItemRequest};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ItemView>>> {
    Ok(Json(state.items.list_items().await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemView>)> {
    let item = state.items.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> ApiResult<Json<ItemView>> {
    Ok(Json(state.items.get_item(item_id).await?))
}

pub async fn replace(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(item_id): Path<i64>,
    ValidatedJson(input): ValidatedJson<ReplaceItemRequest>,
) -> ApiResult<Json<ItemView>> {
    Ok(Json(state.items.replace_item(item_id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(item_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.items.delete_item(&caller, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
