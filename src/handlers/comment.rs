use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentListParams, CreateCommentRequest},
    service::CommentService,
};

/// Create a new comment, optionally as a reply.
pub async fn create_comment(
    State(service): State<CommentService>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_id = service
        .create_comment(&payload.message, payload.parent_id.unwrap_or(0))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": new_id })),
    ))
}

/// List one page of direct children of a comment (or of the top level).
pub async fn list_comments(
    State(service): State<CommentService>,
    Query(params): Query<CommentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (target_id, opts) = params.into_opts();
    let view = service.fetch_comments(target_id, &opts).await?;

    Ok(Json(view))
}

/// Delete a single comment. Replies are left in place.
pub async fn delete_comment(
    State(service): State<CommentService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest("id should be > 0".to_string()));
    }

    service.delete_comment(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
