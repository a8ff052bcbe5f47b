//! Item service

use super::{item_view, require_item, require_store};
use crate::storage::{queries, Database, StorageResultExt};
use std::sync::Arc;
use stores_core::{Caller, FieldErrors, Result, ServiceError};
use stores_types::{Item, ItemReplacement, ItemView, NewItem};
use tracing::{info, warn};

pub struct ItemService {
    db: Arc<Database>,
}

impl ItemService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_item(&self, input: NewItem) -> Result<ItemView> {
        info!("Creating item: {} in store {}", input.name, input.store_id);

        let mut tx = self.db.begin_write().await.or_storage()?;
        let store = require_store(&mut *tx, input.store_id).await?;
        let id = queries::insert_item(&mut *tx, None, &input.name, input.price, store.id)
            .await
            .or_duplicate("item")?;
        tx.commit().await.or_storage()?;

        let item = Item {
            id,
            name: input.name,
            price: input.price,
            store_id: store.id,
        };
        Ok(ItemView::new(item, store, Vec::new()))
    }

    pub async fn get_item(&self, id: i64) -> Result<ItemView> {
        let mut conn = self.db.acquire().await.or_storage()?;
        let item = require_item(&mut *conn, id).await?;
        item_view(&mut *conn, item).await
    }

    pub async fn list_items(&self) -> Result<Vec<ItemView>> {
        let mut conn = self.db.acquire().await.or_storage()?;
        let items = queries::list_items(&mut *conn).await.or_storage()?;

        let mut views = Vec::with_capacity(items.len());
        for item in items {
            views.push(item_view(&mut *conn, item).await?);
        }
        Ok(views)
    }

    /// Idempotent full replace
    ///
    /// Updates name and price when the item exists. Otherwise creates it
    /// under exactly `id`, which is the only time `store_id` is read.
    pub async fn replace_item(&self, id: i64, input: ItemReplacement) -> Result<ItemView> {
        let mut tx = self.db.begin_write().await.or_storage()?;

        match queries::find_item(&mut *tx, id).await.or_storage()? {
            Some(_) => {
                info!("Updating item {}: {}", id, input.name);
                queries::update_item(&mut *tx, id, &input.name, input.price)
                    .await
                    .or_duplicate("item")?;
            }
            None => {
                let store_id = input.store_id.ok_or_else(|| {
                    FieldErrors::single("store_id", "Required when the item does not exist.")
                })?;
                info!("Creating item {} via replace: {}", id, input.name);
                let store = require_store(&mut *tx, store_id).await?;
                queries::insert_item(&mut *tx, Some(id), &input.name, input.price, store.id)
                    .await
                    .or_duplicate("item")?;
            }
        }

        let item = require_item(&mut *tx, id).await?;
        let view = item_view(&mut *tx, item).await?;
        tx.commit().await.or_storage()?;

        Ok(view)
    }

    /// Admin-only delete; the privilege check precedes any lookup
    pub async fn delete_item(&self, caller: &Caller, id: i64) -> Result<()> {
        if !caller.is_admin {
            warn!(
                "Refusing item {} delete for non-admin identity {}",
                id, caller.identity
            );
            return Err(ServiceError::Unauthorized(
                "Admin privilege required".to_string(),
            ));
        }

        let mut tx = self.db.begin_write().await.or_storage()?;
        require_item(&mut *tx, id).await?;
        queries::delete_item(&mut *tx, id).await.or_storage()?;
        tx.commit().await.or_storage()?;

        info!("Deleted item {}", id);
        Ok(())
    }
}
