//! Tag service

use super::{item_view, require_item, require_store, require_tag, tag_view};
use crate::storage::{
    is_foreign_key_violation, queries, storage_error, Database, StorageResultExt,
};
use std::sync::Arc;
use stores_core::{Result, ServiceError};
use stores_types::{NewTag, Tag, TagView, UnlinkView};
use tracing::{info, warn};

pub struct TagService {
    db: Arc<Database>,
}

impl TagService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_tag(&self, store_id: i64, input: NewTag) -> Result<TagView> {
        info!("Creating tag: {} in store {}", input.name, store_id);

        let mut tx = self.db.begin_write().await.or_storage()?;
        let store = require_store(&mut *tx, store_id).await?;
        let id = queries::insert_tag(&mut *tx, &input.name, store.id)
            .await
            .or_duplicate("tag")?;
        tx.commit().await.or_storage()?;

        let tag = Tag {
            id,
            name: input.name,
            store_id: store.id,
        };
        Ok(TagView::new(tag, Some(store), Vec::new()))
    }

    pub async fn get_tag(&self, id: i64) -> Result<TagView> {
        let mut conn = self.db.acquire().await.or_storage()?;
        let tag = require_tag(&mut *conn, id).await?;
        tag_view(&mut *conn, tag).await
    }

    pub async fn list_tags_for_store(&self, store_id: i64) -> Result<Vec<TagView>> {
        let mut conn = self.db.acquire().await.or_storage()?;
        require_store(&mut *conn, store_id).await?;
        let tags = queries::tags_for_store(&mut *conn, store_id)
            .await
            .or_storage()?;

        let mut views = Vec::with_capacity(tags.len());
        for tag in tags {
            views.push(tag_view(&mut *conn, tag).await?);
        }
        Ok(views)
    }

    /// Deletes a tag that no item references
    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await.or_storage()?;
        require_tag(&mut *tx, id).await?;

        let links = queries::count_links_for_tag(&mut *tx, id)
            .await
            .or_storage()?;
        if links > 0 {
            warn!("Refusing to delete tag {} linked to {} item(s)", id, links);
            return Err(ServiceError::TagInUse);
        }

        // A link committed after the count still trips the foreign key
        queries::delete_tag(&mut *tx, id).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                ServiceError::TagInUse
            } else {
                storage_error(e)
            }
        })?;
        tx.commit().await.or_storage()?;

        info!("Deleted tag {}", id);
        Ok(())
    }

    /// Links an item and a tag of the same store; re-linking is a no-op
    pub async fn link_item_tag(&self, item_id: i64, tag_id: i64) -> Result<TagView> {
        let mut tx = self.db.begin_write().await.or_storage()?;
        let item = require_item(&mut *tx, item_id).await?;
        let tag = require_tag(&mut *tx, tag_id).await?;

        if item.store_id != tag.store_id {
            warn!(
                "Refusing cross-store link: item {} (store {}) / tag {} (store {})",
                item.id, item.store_id, tag.id, tag.store_id
            );
            return Err(ServiceError::CrossStoreLink);
        }

        if queries::insert_link(&mut *tx, item.id, tag.id)
            .await
            .or_storage()?
        {
            info!("Linked item {} with tag {}", item.id, tag.id);
        }

        let view = tag_view(&mut *tx, tag).await?;
        tx.commit().await.or_storage()?;
        Ok(view)
    }

    pub async fn unlink_item_tag(&self, item_id: i64, tag_id: i64) -> Result<UnlinkView> {
        let mut tx = self.db.begin_write().await.or_storage()?;
        let item = require_item(&mut *tx, item_id).await?;
        let tag = require_tag(&mut *tx, tag_id).await?;

        if !queries::is_linked(&mut *tx, item.id, tag.id)
            .await
            .or_storage()?
        {
            return Err(ServiceError::LinkNotFound);
        }

        queries::delete_link(&mut *tx, item.id, tag.id)
            .await
            .or_storage()?;

        let item = item_view(&mut *tx, item).await?;
        let tag = tag_view(&mut *tx, tag).await?;
        tx.commit().await.or_storage()?;

        info!("Unlinked item {} from tag {}", item.id, tag.id);
        Ok(UnlinkView {
            message: "Item removed from tag".to_string(),
            item,
            tag,
        })
    }
}
