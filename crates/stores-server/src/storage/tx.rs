//! Write transactions
//!
//! `sqlx` opens SQLite transactions with a plain (deferred) `BEGIN`. A
//! deferred transaction that reads before it writes holds a WAL snapshot,
//! and if another writer commits first the upgrade fails with
//! `SQLITE_BUSY` without waiting on the busy handler. Every read-then-write
//! service call therefore starts with `BEGIN IMMEDIATE`, which takes the
//! write lock up front and queues behind `busy_timeout` instead.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::ops::{Deref, DerefMut};
use tracing::warn;

const CONNECTION_HELD: &str = "write transaction holds its connection until commit or drop";

/// Transaction holding SQLite's write lock; dropping it without `commit`
/// rolls back
pub struct WriteTx {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTx {
    pub(super) async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self { conn: Some(conn) })
    }

    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        if let Some(conn) = self.conn.as_deref_mut() {
            sqlx::query("COMMIT").execute(conn).await?;
        }
        // Committed; the connection goes back to the pool as is
        self.conn.take();
        Ok(())
    }
}

impl Deref for WriteTx {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        self.conn.as_deref().expect(CONNECTION_HELD)
    }
}

impl DerefMut for WriteTx {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        self.conn.as_deref_mut().expect(CONNECTION_HELD)
    }
}

impl Drop for WriteTx {
    fn drop(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                        // Closing the connection discards the transaction
                        warn!("Rollback failed, closing connection: {}", e);
                        drop(conn.detach());
                    }
                });
            }
            Err(_) => drop(conn.detach()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{queries, Database};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let db = Database::in_memory().await.unwrap();

        {
            let mut tx = db.begin_write().await.unwrap();
            queries::insert_store(&mut *tx, "Abandoned").await.unwrap();
        }
        {
            let mut tx = db.begin_write().await.unwrap();
            queries::insert_store(&mut *tx, "Kept").await.unwrap();
            tx.commit().await.unwrap();
        }

        let mut conn = db.acquire().await.unwrap();
        let stores = queries::list_stores(&mut *conn).await.unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "Kept");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_writers_queue_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(
            Database::new(&format!("sqlite://{}/stores.db", dir.path().display()))
                .await
                .unwrap(),
        );

        let mut first = db.begin_write().await.unwrap();
        queries::insert_store(&mut *first, "First").await.unwrap();

        let waiting = tokio::spawn({
            let db = db.clone();
            async move {
                let mut tx = db.begin_write().await?;
                let seen = queries::count_stores(&mut *tx).await?;
                queries::insert_store(&mut *tx, "Second").await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>(seen)
            }
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        first.commit().await.unwrap();

        // The second writer starts after the first commits and sees its row
        assert_eq!(waiting.await.unwrap().unwrap(), 1);
    }
}
