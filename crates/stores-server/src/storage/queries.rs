//! Row-level queries
//!
//! Every function runs on a borrowed connection so callers decide whether
//! it happens inside a transaction.

use sqlx::SqliteConnection;
use stores_types::{Item, Store, Tag};

type QueryResult<T> = Result<T, sqlx::Error>;

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct StoreRow {
    id: i64,
    name: String,
}

impl From<StoreRow> for Store {
    fn from(r: StoreRow) -> Self {
        Store {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    price: f64,
    store_id: i64,
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Item {
            id: r.id,
            name: r.name,
            price: r.price,
            store_id: r.store_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
    store_id: i64,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Tag {
            id: r.id,
            name: r.name,
            store_id: r.store_id,
        }
    }
}

/// User row including the password hash; never leaves the server
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

// Store operations
pub async fn insert_store(conn: &mut SqliteConnection, name: &str) -> QueryResult<i64> {
    let result = sqlx::query("INSERT INTO stores (name) VALUES (?1)")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_store(conn: &mut SqliteConnection, id: i64) -> QueryResult<Option<Store>> {
    let row: Option<StoreRow> = sqlx::query_as("SELECT id, name FROM stores WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(Into::into))
}

pub async fn list_stores(conn: &mut SqliteConnection) -> QueryResult<Vec<Store>> {
    let rows: Vec<StoreRow> = sqlx::query_as("SELECT id, name FROM stores ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

#[cfg(test)]
pub async fn count_stores(conn: &mut SqliteConnection) -> QueryResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stores")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn delete_store(conn: &mut SqliteConnection, id: i64) -> QueryResult<u64> {
    let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// Item operations
pub async fn insert_item(
    conn: &mut SqliteConnection,
    id: Option<i64>,
    name: &str,
    price: f64,
    store_id: i64,
) -> QueryResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO items (id, name, price, store_id)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(store_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_item(conn: &mut SqliteConnection, id: i64) -> QueryResult<Option<Item>> {
    let row: Option<ItemRow> =
        sqlx::query_as("SELECT id, name, price, store_id FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(Into::into))
}

pub async fn list_items(conn: &mut SqliteConnection) -> QueryResult<Vec<Item>> {
    let rows: Vec<ItemRow> = sqlx::query_as("SELECT id, name, price, store_id FROM items ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn items_for_store(conn: &mut SqliteConnection, store_id: i64) -> QueryResult<Vec<Item>> {
    let rows: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT id, name, price, store_id FROM items
        WHERE store_id = ?1
        ORDER BY id
        "#,
    )
    .bind(store_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn items_for_tag(conn: &mut SqliteConnection, tag_id: i64) -> QueryResult<Vec<Item>> {
    let rows: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT i.id, i.name, i.price, i.store_id
        FROM items i
        JOIN items_tags it ON it.item_id = i.id
        WHERE it.tag_id = ?1
        ORDER BY i.id
        "#,
    )
    .bind(tag_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Full replace of the mutable columns; the owning store never changes
pub async fn update_item(
    conn: &mut SqliteConnection,
    id: i64,
    name: &str,
    price: f64,
) -> QueryResult<u64> {
    let result = sqlx::query("UPDATE items SET name = ?1, price = ?2 WHERE id = ?3")
        .bind(name)
        .bind(price)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_item(conn: &mut SqliteConnection, id: i64) -> QueryResult<u64> {
    let result = sqlx::query("DELETE FROM items WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// Tag operations
pub async fn insert_tag(conn: &mut SqliteConnection, name: &str, store_id: i64) -> QueryResult<i64> {
    let result = sqlx::query("INSERT INTO tags (name, store_id) VALUES (?1, ?2)")
        .bind(name)
        .bind(store_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_tag(conn: &mut SqliteConnection, id: i64) -> QueryResult<Option<Tag>> {
    let row: Option<TagRow> = sqlx::query_as("SELECT id, name, store_id FROM tags WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(Into::into))
}

pub async fn tags_for_store(conn: &mut SqliteConnection, store_id: i64) -> QueryResult<Vec<Tag>> {
    let rows: Vec<TagRow> =
        sqlx::query_as("SELECT id, name, store_id FROM tags WHERE store_id = ?1 ORDER BY id")
            .bind(store_id)
            .fetch_all(&mut *conn)
            .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn tags_for_item(conn: &mut SqliteConnection, item_id: i64) -> QueryResult<Vec<Tag>> {
    let rows: Vec<TagRow> = sqlx::query_as(
        r#"
        SELECT t.id, t.name, t.store_id
        FROM tags t
        JOIN items_tags it ON it.tag_id = t.id
        WHERE it.item_id = ?1
        ORDER BY t.id
        "#,
    )
    .bind(item_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn delete_tag(conn: &mut SqliteConnection, id: i64) -> QueryResult<u64> {
    let result = sqlx::query("DELETE FROM tags WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// Link operations
pub async fn count_links_for_tag(conn: &mut SqliteConnection, tag_id: i64) -> QueryResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items_tags WHERE tag_id = ?1")
        .bind(tag_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn is_linked(conn: &mut SqliteConnection, item_id: i64, tag_id: i64) -> QueryResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT item_id FROM items_tags WHERE item_id = ?1 AND tag_id = ?2")
            .bind(item_id)
            .bind(tag_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.is_some())
}

/// Returns false when the pair was already linked
pub async fn insert_link(conn: &mut SqliteConnection, item_id: i64, tag_id: i64) -> QueryResult<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO items_tags (item_id, tag_id) VALUES (?1, ?2)")
        .bind(item_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_link(conn: &mut SqliteConnection, item_id: i64, tag_id: i64) -> QueryResult<u64> {
    let result = sqlx::query("DELETE FROM items_tags WHERE item_id = ?1 AND tag_id = ?2")
        .bind(item_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// User operations
pub async fn insert_user(
    conn: &mut SqliteConnection,
    username: &str,
    password_hash: &str,
) -> QueryResult<i64> {
    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?1, ?2)")
        .bind(username)
        .bind(password_hash)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_user(conn: &mut SqliteConnection, id: i64) -> QueryResult<Option<UserRow>> {
    sqlx::query_as("SELECT id, username, password_hash FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> QueryResult<Option<UserRow>> {
    sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = ?1")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn delete_user(conn: &mut SqliteConnection, id: i64) -> QueryResult<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
