use std::sync::Arc;

use super::ServiceError;
use crate::models::comment::{CommentView, GetterOpts, Scope};
use crate::storage::CommentStore;

/// Entry point used by the HTTP handlers.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    /// Creates a comment. `parent_id == 0` makes it a top-level comment.
    pub async fn create_comment(&self, message: &str, parent_id: i64) -> Result<i64, ServiceError> {
        if message.is_empty() {
            return Err(ServiceError::WrongData("empty comment text".to_string()));
        }
        if parent_id < 0 {
            return Err(ServiceError::WrongData("wrong parent id".to_string()));
        }

        let id = self
            .store
            .create_comment(message, Scope::from_id(parent_id).parent_id())
            .await?;
        tracing::info!("Created comment {} (parent {})", id, parent_id);
        Ok(id)
    }

    /// Fetches the direct children of `target_id` (0 for the top level).
    pub async fn fetch_comments(
        &self,
        target_id: i64,
        opts: &GetterOpts,
    ) -> Result<CommentView, ServiceError> {
        if target_id < 0 {
            return Err(ServiceError::WrongData("wrong id".to_string()));
        }

        Ok(self.store.comments(Scope::from_id(target_id), opts).await?)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::WrongData("wrong id".to_string()));
        }

        self.store.delete_comment(id).await?;
        tracing::info!("Deleted comment {}", id);
        Ok(())
    }
}
