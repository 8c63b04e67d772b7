use async_trait::async_trait;
use sqlx::any::AnyArguments;
use sqlx::query::QueryAs;
use sqlx::{Any, AnyPool};

use super::query::{self, ComposedQuery, Param};
use super::retry::{RetryPolicy, with_retry};
use super::{CommentStore, StorageError, StorageResult};
use crate::models::comment::{Comment, CommentRow, CommentView, GetterOpts, Scope};

/// Tunables handed to the repository at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositoryConfig {
    /// Number of children returned per page.
    pub page_size: i64,
    /// Applied to reads only; writes are never retried.
    pub retry: RetryPolicy,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            retry: RetryPolicy::default(),
        }
    }
}

/// `comments` table access through any sqlx-supported SQL backend.
#[derive(Clone)]
pub struct SqlCommentRepository {
    pool: AnyPool,
    config: RepositoryConfig,
}

impl SqlCommentRepository {
    pub fn new(pool: AnyPool, config: RepositoryConfig) -> Self {
        Self { pool, config }
    }

    async fn fetch_comment(&self, id: i64) -> Result<Option<CommentRow>, sqlx::Error> {
        sqlx::query_as::<_, CommentRow>("SELECT id, message, parent_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn fetch_page(&self, composed: &ComposedQuery) -> Result<Vec<CommentRow>, sqlx::Error> {
        let sql = composed.select_sql();
        bind_params(sqlx::query_as::<_, CommentRow>(&sql), &composed.params)
            .fetch_all(&self.pool)
            .await
    }

    async fn fetch_last_id(&self, composed: &ComposedQuery) -> Result<Option<i64>, sqlx::Error> {
        let sql = composed.last_id_sql();
        let row = bind_params(sqlx::query_as::<_, (i64,)>(&sql), &composed.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}

fn bind_params<'q, O>(
    mut query: QueryAs<'q, Any, O, AnyArguments<'q>>,
    params: &[Param],
) -> QueryAs<'q, Any, O, AnyArguments<'q>> {
    for param in params {
        query = match param {
            Param::Int(value) => query.bind(*value),
            Param::Text(value) => query.bind(value.clone()),
        };
    }
    query
}

#[async_trait]
impl CommentStore for SqlCommentRepository {
    async fn create_comment(&self, message: &str, parent: Option<i64>) -> StorageResult<i64> {
        // The transaction only makes the two statements commit together. The
        // parent check takes no lock, so a concurrent delete of the parent can
        // still land between the check and the insert.
        let mut tx = self.pool.begin().await?;

        let (id,) = match parent {
            Some(parent_id) => {
                let parent_row = sqlx::query_as::<_, (i64,)>("SELECT id FROM comments WHERE id = $1")
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if parent_row.is_none() {
                    tracing::debug!("Rejecting reply to missing comment {}", parent_id);
                    return Err(StorageError::ForeignKeyViolation);
                }

                sqlx::query_as::<_, (i64,)>(
                    "INSERT INTO comments (message, parent_id) VALUES ($1, $2) RETURNING id",
                )
                .bind(message)
                .bind(parent_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, (i64,)>("INSERT INTO comments (message) VALUES ($1) RETURNING id")
                    .bind(message)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(id)
    }

    async fn comments(&self, scope: Scope, opts: &GetterOpts) -> StorageResult<CommentView> {
        let retry = &self.config.retry;

        let parent = match scope {
            Scope::Root => None,
            Scope::Parent(id) => {
                let row = with_retry(retry, "fetch parent comment", || self.fetch_comment(id))
                    .await?
                    .ok_or(StorageError::NotFound)?;
                Some(Comment::from(row))
            }
        };

        let composed = query::compose(scope, opts, self.config.page_size);
        let rows = with_retry(retry, "fetch child comments", || self.fetch_page(&composed)).await?;
        let mut children: Vec<Comment> = rows.into_iter().map(Comment::from).collect();

        // An empty page is a valid result, not a miss.
        if !children.is_empty() {
            let last_id =
                with_retry(retry, "fetch last comment id", || self.fetch_last_id(&composed))
                    .await?;
            query::mark_have_next(&mut children, last_id);
        }

        Ok(CommentView { parent, children })
    }

    async fn delete_comment(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotAffected);
        }
        Ok(())
    }
}
