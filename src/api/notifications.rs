//! Notification API endpoints.

use axum::extract::{Path, State};

use super::{require_identity, success, ApiResult};
use crate::models::{Notification, UnreadCountResponse};
use crate::AppState;

/// GET /api/notifications - The current user's feed, newest first.
pub async fn list_notifications(State(state): State<AppState>) -> ApiResult<Vec<Notification>> {
    let session = require_identity(&state).await?;
    success(state.notifications.list_for(&session.email).await)
}

/// GET /api/notifications/unread-count - The unread badge number.
pub async fn unread_count(State(state): State<AppState>) -> ApiResult<UnreadCountResponse> {
    let session = require_identity(&state).await?;
    let count = state.notifications.unread_count_for(&session.email).await;
    success(UnreadCountResponse { count })
}

/// POST /api/notifications/:id/read - Mark one entry read. Ghost ids
/// report false instead of failing.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    require_identity(&state).await?;
    success(state.notifications.mark_read(&id).await?)
}

/// DELETE /api/notifications - Clear the queue. This empties the feed
/// for every user, matching the client it replaced.
pub async fn clear_notifications(State(state): State<AppState>) -> ApiResult<()> {
    require_identity(&state).await?;
    state.notifications.clear_all().await?;
    success(())
}
