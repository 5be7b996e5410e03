//! REST API module.
//!
//! Contains all API routes and handlers following the browser client's
//! contract.

mod auth;
mod comments;
mod favorites;
mod notifications;
mod posts;
mod reports;
mod users;

pub use auth::*;
pub use comments::*;
pub use favorites::*;
pub use notifications::*;
pub use posts::*;
pub use reports::*;
pub use users::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Session;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError) -> ApiResult<T> {
    Err(err)
}

/// The signed-in session, or 401.
pub(crate) async fn require_identity(state: &AppState) -> Result<Session, AppError> {
    state
        .identity
        .session()
        .await
        .ok_or_else(|| AppError::Unauthorized("Please log in first".to_string()))
}

/// The signed-in session, refusing blocked accounts.
pub(crate) async fn require_unblocked(state: &AppState) -> Result<Session, AppError> {
    let session = require_identity(state).await?;
    if session.is_blocked {
        return Err(AppError::Forbidden(
            "Your account has been restricted from posting".to_string(),
        ));
    }
    Ok(session)
}

/// The signed-in session, admins only.
pub(crate) async fn require_admin(state: &AppState) -> Result<Session, AppError> {
    let session = require_identity(state).await?;
    if !session.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(session)
}
