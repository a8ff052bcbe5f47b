//! Tag and item-tag link handlers

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stores_types::{CreateTagRequest, Message, TagView, UnlinkView};

pub async fn list_for_store(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
) -> ApiResult<Json<Vec<TagView>>> {
    Ok(Json(state.tags.list_tags_for_store(store_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
    ValidatedJson(input): ValidatedJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<TagView>)> {
    let tag = state.tags.create_tag(store_id, input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
) -> ApiResult<Json<TagView>> {
    Ok(Json(state.tags.get_tag(tag_id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    state.tags.delete_tag(tag_id).await?;
    Ok((StatusCode::ACCEPTED, Json(Message::new("Tag deleted"))))
}

pub async fn link(
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<(StatusCode, Json<TagView>)> {
    let tag = state.tags.link_item_tag(item_id, tag_id).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn unlink(
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<Json<UnlinkView>> {
    Ok(Json(state.tags.unlink_item_tag(item_id, tag_id).await?))
}
