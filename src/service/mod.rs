//! Business rules on top of [`CommentStore`](crate::storage::CommentStore).
//!
//! Requests are validated here before anything reaches storage, and storage
//! outcomes are narrowed into [`ServiceError`].

pub mod comments;

use thiserror::Error;

use crate::storage::StorageError;

pub use comments::CommentService;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The client sent something unusable, including an unknown parent.
    #[error("wrong data: {0}")]
    WrongData(String),

    #[error("comment not found")]
    NotFound,

    #[error("no comment with this id")]
    NotAffected,

    #[error("storage failure")]
    StorageInternal(#[source] StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ServiceError::NotFound,
            StorageError::NotAffected => ServiceError::NotAffected,
            StorageError::ForeignKeyViolation => {
                ServiceError::WrongData("parent comment does not exist".to_string())
            }
            other => ServiceError::StorageInternal(other),
        }
    }
}
