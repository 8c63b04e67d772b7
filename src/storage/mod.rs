//! Persistence layer for comments.
//!
//! Raw `sqlx` errors never leave this module unclassified: they are narrowed
//! into [`StorageError`] so the service layer can match on outcomes.

pub mod comments;
pub mod query;
pub mod retry;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::comment::{CommentView, GetterOpts, Scope};

pub use comments::{RepositoryConfig, SqlCommentRepository};
pub use retry::RetryPolicy;

/// Postgres SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("no rows affected")]
    NotAffected,

    #[error("referenced parent comment does not exist")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation()
                || db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
            {
                return StorageError::ForeignKeyViolation;
            }
        }
        StorageError::Database(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Data access contract the service layer depends on.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Inserts a comment under `parent` (or at the top level) and returns its id.
    async fn create_comment(&self, message: &str, parent: Option<i64>) -> StorageResult<i64>;

    /// Resolves the scope's parent and one page of its direct children.
    async fn comments(&self, scope: Scope, opts: &GetterOpts) -> StorageResult<CommentView>;

    async fn delete_comment(&self, id: i64) -> StorageResult<()>;
}
