//! Store service

use super::{require_store, store_view};
use crate::storage::{queries, Database, StorageResultExt};
use std::sync::Arc;
use stores_core::Result;
use stores_types::{NewStore, Store, StoreView};
use tracing::info;

pub struct StoreService {
    db: Arc<Database>,
}

impl StoreService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_store(&self, input: NewStore) -> Result<StoreView> {
        info!("Creating store: {}", input.name);

        let mut tx = self.db.begin_write().await.or_storage()?;
        let id = queries::insert_store(&mut *tx, &input.name)
            .await
            .or_duplicate("store")?;
        tx.commit().await.or_storage()?;

        let store = Store {
            id,
            name: input.name,
        };
        Ok(StoreView::new(store, Vec::new(), Vec::new()))
    }

    pub async fn get_store(&self, id: i64) -> Result<StoreView> {
        let mut conn = self.db.acquire().await.or_storage()?;
        let store = require_store(&mut *conn, id).await?;
        store_view(&mut *conn, store).await
    }

    pub async fn list_stores(&self) -> Result<Vec<StoreView>> {
        let mut conn = self.db.acquire().await.or_storage()?;
        let stores = queries::list_stores(&mut *conn).await.or_storage()?;

        let mut views = Vec::with_capacity(stores.len());
        for store in stores {
            views.push(store_view(&mut *conn, store).await?);
        }
        Ok(views)
    }

    /// Removes the store and its items; its tags are left in place
    pub async fn delete_store(&self, id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await.or_storage()?;
        require_store(&mut *tx, id).await?;

        let items = queries::items_for_store(&mut *tx, id).await.or_storage()?;
        queries::delete_store(&mut *tx, id).await.or_storage()?;
        tx.commit().await.or_storage()?;

        info!("Deleted store {} and {} item(s)", id, items.len());
        Ok(())
    }
}
