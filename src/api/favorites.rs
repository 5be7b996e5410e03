//! Favorite API endpoints.

use axum::extract::{Path, State};

use super::{require_identity, success, ApiResult};
use crate::models::{FavoriteToggleResponse, Post};
use crate::AppState;

/// POST /api/posts/:id/favorite - Star or unstar a post.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResult<FavoriteToggleResponse> {
    let session = require_identity(&state).await?;
    let favorited = state.favorites.toggle(&session.email, post_id).await?;
    success(FavoriteToggleResponse { post_id, favorited })
}

/// GET /api/me/favorites - The current user's favorited posts, in
/// post-list order. Ids whose post has vanished are simply absent.
pub async fn my_favorites(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let session = require_identity(&state).await?;
    let ids = state.favorites.favorites_for(&session.email).await;
    success(state.content.posts_with_ids(&ids).await)
}
