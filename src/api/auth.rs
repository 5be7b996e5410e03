//! Session API endpoints.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{LoginRequest, Session};
use crate::AppState;

/// POST /api/auth/login - Sign in, registering the email on first sight.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Session> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return error(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    let session = state.identity.login(email).await?;
    success(session)
}

/// POST /api/auth/logout - Clear the current session.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    state.identity.logout().await?;
    success(())
}

/// GET /api/auth/session - The current session, or null.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Option<Session>> {
    success(state.identity.session().await)
}
