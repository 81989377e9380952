//! Data access layer
//!
//! Each aggregate has a store trait so services can run against
//! PostgreSQL in production and against [`MemoryStore`] in tests or
//! database-less development.

pub mod book;
pub mod category;
pub mod memory;
pub mod order;
pub mod user;

pub use book::{BookStore, PgBookRepository};
pub use category::{CategoryStore, PgCategoryRepository};
pub use memory::MemoryStore;
pub use order::{OrderStore, PgOrderRepository};
pub use user::{NewUser, PgUserRepository, ProfileChanges, UserRecord, UserStore};

use thiserror::Error;

/// Store-level failure
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness or reference constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error, turning constraint violations into conflicts
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return StoreError::Conflict(conflict.to_string());
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound, "Email already registered");
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(StoreError::NotFound("Book".into()).to_string(), "Book not found");
        assert_eq!(StoreError::Conflict("Slug taken".into()).to_string(), "Slug taken");
    }
}
