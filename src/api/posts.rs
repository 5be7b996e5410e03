//! Post API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, require_identity, require_unblocked, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Author, CreatePostRequest, Post, UpdatePostRequest, CATEGORIES};
use crate::AppState;

/// GET /api/posts - The merged post list, local posts first.
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    success(state.content.posts().await)
}

/// GET /api/posts/:id - A single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Post> {
    match state.content.post(id).await {
        Some(post) => success(post),
        None => error(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// GET /api/authors - The provider author personas.
pub async fn list_authors(State(state): State<AppState>) -> ApiResult<Vec<Author>> {
    success(state.content.authors().await)
}

/// GET /api/categories - The fixed category list.
pub async fn list_categories() -> ApiResult<Vec<&'static str>> {
    success(CATEGORIES.to_vec())
}

/// POST /api/posts - Create a post.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Post> {
    let session = require_unblocked(&state).await?;

    // Validate required fields
    if request.title.trim().is_empty() {
        return error(AppError::Validation("Title is required".to_string()));
    }
    if request.body.trim().is_empty() {
        return error(AppError::Validation("Body is required".to_string()));
    }
    if !CATEGORIES.contains(&request.category.as_str()) {
        return error(AppError::Validation(format!(
            "Unknown category: {}",
            request.category
        )));
    }

    let post = state.content.add_post(&request, &session.email).await?;
    success(post)
}

/// PUT /api/posts/:id - Edit a post. Owner only; missing ids are
/// silent no-ops.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Option<Post>> {
    let session = require_identity(&state).await?;

    if let Some(category) = &request.category {
        if !CATEGORIES.contains(&category.as_str()) {
            return error(AppError::Validation(format!(
                "Unknown category: {}",
                category
            )));
        }
    }

    let updated = state.content.update_post(id, &request, &session.email).await?;
    success(updated)
}

/// DELETE /api/posts/:id - Delete a post, owner or admin.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let session = require_identity(&state).await?;

    let Some(post) = state.content.post(id).await else {
        return success(false);
    };
    if post.creator_email != session.email && !session.is_admin {
        return error(AppError::Forbidden(
            "You can only delete your own posts".to_string(),
        ));
    }

    let removed = state.content.remove(id).await?;
    success(removed)
}

/// GET /api/me/posts - The current user's posts.
pub async fn my_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let session = require_identity(&state).await?;
    success(state.content.posts_by(&session.email).await)
}
