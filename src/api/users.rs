//! User administration API endpoints.

use axum::extract::{Path, State};

use super::{require_admin, success, ApiResult};
use crate::models::{FlagChangeResponse, UserAccount};
use crate::AppState;

/// GET /api/users - Every registered identity with its flags.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserAccount>> {
    require_admin(&state).await?;
    success(state.identity.all_users().await)
}

/// POST /api/users/:email/promote - Grant admin.
pub async fn promote_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<FlagChangeResponse> {
    require_admin(&state).await?;
    let changed = state.identity.promote(&email).await?;
    success(FlagChangeResponse { email, changed })
}

/// POST /api/users/:email/demote - Revoke admin. The built-in admin
/// is refused.
pub async fn demote_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<FlagChangeResponse> {
    require_admin(&state).await?;
    let changed = state.identity.demote(&email).await?;
    success(FlagChangeResponse { email, changed })
}

/// POST /api/users/:email/block - Block an identity.
pub async fn block_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<FlagChangeResponse> {
    require_admin(&state).await?;
    let changed = state.identity.block(&email).await?;
    success(FlagChangeResponse { email, changed })
}

/// POST /api/users/:email/unblock - Lift a block.
pub async fn unblock_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<FlagChangeResponse> {
    require_admin(&state).await?;
    let changed = state.identity.unblock(&email).await?;
    success(FlagChangeResponse { email, changed })
}
