//! Store handlers

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stores_types::{CreateStoreRequest, StoreView};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<StoreView>>> {
    Ok(Json(state.stores.list_stores().await?))
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateStoreRequest>,
) -> ApiResult<(StatusCode, Json<StoreView>)> {
    let store = state.stores.create_store(input).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
) -> ApiResult<Json<StoreView>> {
    Ok(Json(state.stores.get_store(store_id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.stores.delete_store(store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
