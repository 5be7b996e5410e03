//! Comment API endpoints. These handlers are the orchestration point
//! that turns comment events into notifications.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, require_identity, require_unblocked, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Comment, CommentEvent, CreateCommentRequest, ReactionKind, UpdateCommentRequest,
};
use crate::AppState;

/// GET /api/posts/:id/comments - The post's comment trees, after
/// merging in whatever the provider has for that post. A dead provider
/// only means no new comments.
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResult<Vec<Comment>> {
    if let Some(remote) = state.provider.fetch_comments(post_id).await {
        state.comments.ingest_remote(remote).await?;
    }
    success(state.comments.trees_for_post(post_id).await)
}

/// POST /api/posts/:id/comments - Add a top-level comment.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<Comment> {
    let session = require_unblocked(&state).await?;

    // Validate required fields
    if request.name.trim().is_empty() {
        return error(AppError::Validation("Name is required".to_string()));
    }
    if request.body.trim().is_empty() {
        return error(AppError::Validation("Comment body is required".to_string()));
    }

    let comment = state
        .comments
        .add_top_level(post_id, &request, &session.email)
        .await?;
    success(comment)
}

/// POST /api/comments/:id/replies - Reply under a comment. A parent
/// that vanished in the meantime yields success with null data.
pub async fn create_reply(
    State(state): State<AppState>,
    Path(parent_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<Option<Comment>> {
    let session = require_unblocked(&state).await?;

    if request.name.trim().is_empty() {
        return error(AppError::Validation("Name is required".to_string()));
    }
    if request.body.trim().is_empty() {
        return error(AppError::Validation("Comment body is required".to_string()));
    }

    let (reply, events) = state
        .comments
        .add_reply(&parent_id, &request, &session.email)
        .await?;
    record_events(&state, &events).await;
    success(reply)
}

/// PUT /api/comments/:id - Edit a comment.
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> ApiResult<Option<Comment>> {
    let session = require_identity(&state).await?;

    if request.body.trim().is_empty() {
        return error(AppError::Validation("Comment body is required".to_string()));
    }

    let updated = state.comments.edit(&id, &request.body, &session.email).await?;
    success(updated)
}

/// DELETE /api/comments/:id - Delete a comment and its subtree.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let session = require_identity(&state).await?;
    let removed = state.comments.delete_own(&id, &session.email).await?;
    success(removed)
}

/// POST /api/comments/:id/like - Toggle a like.
pub async fn like_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<Comment>> {
    react(state, id, ReactionKind::Like).await
}

/// POST /api/comments/:id/dislike - Toggle a dislike.
pub async fn dislike_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<Comment>> {
    react(state, id, ReactionKind::Dislike).await
}

async fn react(state: AppState, id: String, kind: ReactionKind) -> ApiResult<Option<Comment>> {
    let session = require_identity(&state).await?;
    let (updated, events) = state.comments.react(&id, kind, &session.email).await?;
    record_events(&state, &events).await;
    success(updated)
}

/// GET /api/me/comments - Every comment the current user wrote,
/// flattened across posts and depths.
pub async fn my_comments(State(state): State<AppState>) -> ApiResult<Vec<Comment>> {
    let session = require_identity(&state).await?;
    success(state.comments.comments_by(&session.email).await)
}

/// The comment mutation already stuck; a notification that fails to
/// persist is logged and dropped rather than failing the request.
async fn record_events(state: &AppState, events: &[CommentEvent]) {
    for event in events {
        if let Err(e) = state.notifications.record(event).await {
            tracing::warn!("Failed to record notification: {}", e);
        }
    }
}
