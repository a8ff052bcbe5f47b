//! Business logic services
//!
//! Each write runs in a single transaction. Every failure path returns
//! before `commit`, and the dropped transaction rolls back.

pub mod item;
pub mod store;
pub mod tag;
pub mod user;

pub use item::ItemService;
pub use store::StoreService;
pub use tag::TagService;
pub use user::UserService;

use crate::storage::{queries, StorageResultExt};
use sqlx::SqliteConnection;
use stores_core::{Result, ServiceError};
use stores_types::{Item, ItemView, Store, StoreView, Tag, TagView};

pub(crate) async fn store_view(conn: &mut SqliteConnection, store: Store) -> Result<StoreView> {
    let items = queries::items_for_store(conn, store.id).await.or_storage()?;
    let tags = queries::tags_for_store(conn, store.id).await.or_storage()?;
    Ok(StoreView::new(store, items, tags))
}

pub(crate) async fn item_view(conn: &mut SqliteConnection, item: Item) -> Result<ItemView> {
    // The foreign key cascade guarantees the store exists
    let store = queries::find_store(conn, item.store_id)
        .await
        .or_storage()?
        .ok_or_else(|| {
            ServiceError::Storage(format!("item {} references a missing store", item.id))
        })?;
    let tags = queries::tags_for_item(conn, item.id).await.or_storage()?;
    Ok(ItemView::new(item, store, tags))
}

pub(crate) async fn tag_view(conn: &mut SqliteConnection, tag: Tag) -> Result<TagView> {
    let store = queries::find_store(conn, tag.store_id).await.or_storage()?;
    let items = queries::items_for_tag(conn, tag.id).await.or_storage()?;
    Ok(TagView::new(tag, store, items))
}

pub(crate) async fn require_store(conn: &mut SqliteConnection, id: i64) -> Result<Store> {
    queries::find_store(conn, id)
        .await
        .or_storage()?
        .ok_or(ServiceError::not_found("Store", id))
}

pub(crate) async fn require_item(conn: &mut SqliteConnection, id: i64) -> Result<Item> {
    queries::find_item(conn, id)
        .await
        .or_storage()?
        .ok_or(ServiceError::not_found("Item", id))
}

pub(crate) async fn require_tag(conn: &mut SqliteConnection, id: i64) -> Result<Tag> {
    queries::find_tag(conn, id)
        .await
        .or_storage()?
        .ok_or(ServiceError::not_found("Tag", id))
}
