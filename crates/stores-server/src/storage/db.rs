//! SQLite database layer (embedded, no external dependencies)

use super::{StorageResultExt, WriteTx};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use stores_core::ports::RevocationStore;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_url);

        // Create parent directory if needed
        if let Some(path) = database_file(database_url) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tracing::info!("Creating parent directory: {}", parent.display());
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database at: {}", database_url))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Stores table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Items table; items go away with their store
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                price REAL NOT NULL,
                store_id INTEGER NOT NULL REFERENCES stores(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Tags table; deliberately no foreign key so tags outlive their store
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                store_id INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Item/tag links; a link blocks deletion of its tag
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items_tags (
                item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                PRIMARY KEY (item_id, tag_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Revoked token identifiers (append-only)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blocklist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blocked TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_items_store ON items(store_id)",
            "CREATE INDEX IF NOT EXISTS idx_tags_store ON tags(store_id)",
            "CREATE INDEX IF NOT EXISTS idx_items_tags_tag ON items_tags(tag_id)",
        ] {
            sqlx::query(index).execute(pool).await?;
        }

        Ok(())
    }

    /// Start a write transaction holding the database write lock
    pub async fn begin_write(&self) -> Result<WriteTx, sqlx::Error> {
        WriteTx::begin(&self.pool).await
    }

    /// Borrow a connection for reads
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }
}

#[async_trait]
impl RevocationStore for Database {
    async fn revoke(&self, jti: &str) -> stores_core::Result<()> {
        let mut tx = self.begin_write().await.or_storage()?;

        sqlx::query("INSERT OR IGNORE INTO blocklist (blocked) VALUES (?1)")
            .bind(jti)
            .execute(&mut *tx)
            .await
            .or_storage()?;

        tx.commit().await.or_storage()?;
        tracing::info!("Token revoked: jti={}", jti);

        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> stores_core::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM blocklist WHERE blocked = ?1")
            .bind(jti)
            .fetch_optional(&*self.pool)
            .await
            .or_storage()?;

        Ok(row.is_some())
    }
}

/// Filesystem path behind a `sqlite:` URL, if it names a file
fn database_file(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}
