//! Storage layer
//!
//! Uses SQLite (embedded) with foreign keys enforced. Uniqueness and
//! referential integrity live in the schema; this module turns constraint
//! violations into domain errors.

pub mod db;
pub mod queries;
mod tx;

pub use db::Database;
pub use tx::WriteTx;

use stores_core::ServiceError;

/// Normalizes `sqlx` failures at the service boundary
pub trait StorageResultExt<T> {
    /// Any failure becomes `ServiceError::Storage`
    fn or_storage(self) -> Result<T, ServiceError>;

    /// Unique violations become `DuplicateName`, the rest `Storage`
    fn or_duplicate(self, entity: &'static str) -> Result<T, ServiceError>;
}

impl<T> StorageResultExt<T> for Result<T, sqlx::Error> {
    fn or_storage(self) -> Result<T, ServiceError> {
        self.map_err(storage_error)
    }

    fn or_duplicate(self, entity: &'static str) -> Result<T, ServiceError> {
        self.map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::duplicate(entity)
            } else {
                storage_error(e)
            }
        })
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

pub fn storage_error(e: sqlx::Error) -> ServiceError {
    tracing::error!("Database error: {}", e);
    ServiceError::Storage(e.to_string())
}
