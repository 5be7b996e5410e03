//! Report API endpoints, including the admin disposition flow.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, require_admin, require_unblocked, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateReportRequest, Report, ReportAction, ReportTarget, ReviewReportRequest,
};
use crate::AppState;

/// POST /api/reports - File a report against a post or comment.
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> ApiResult<Report> {
    let session = require_unblocked(&state).await?;

    // Validate required fields
    if request.reason.trim().is_empty() {
        return error(AppError::Validation("A reason is required".to_string()));
    }
    if request.target_id.trim().is_empty() {
        return error(AppError::Validation("A target id is required".to_string()));
    }
    if request.reported_user_email == session.email {
        return error(AppError::Forbidden(
            "You cannot report your own content".to_string(),
        ));
    }

    let report = state.reports.file(&request, &session.email).await?;
    success(report)
}

/// GET /api/reports/pending - The admin review queue.
pub async fn list_pending_reports(State(state): State<AppState>) -> ApiResult<Vec<Report>> {
    require_admin(&state).await?;
    success(state.reports.pending().await)
}

/// POST /api/reports/:id/review - Dispose of a report: apply the chosen
/// action, then mark it reviewed and drop it from the queue in one step.
/// Actions against content that has since vanished do nothing.
pub async fn review_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReviewReportRequest>,
) -> ApiResult<Report> {
    require_admin(&state).await?;

    let Some(report) = state.reports.get(&id).await else {
        return error(AppError::NotFound(format!("Report {} not found", id)));
    };

    match request.action {
        ReportAction::Delete => match report.target {
            ReportTarget::Post => {
                if let Ok(post_id) = report.target_id.parse::<i64>() {
                    state.content.remove(post_id).await?;
                }
            }
            ReportTarget::Comment => {
                state.comments.moderate_remove(&report.target_id).await?;
            }
        },
        ReportAction::Block => {
            state.identity.block(&report.reported_user_email).await?;
        }
        ReportAction::Ignore => {}
    }

    match state.reports.resolve(&id).await? {
        Some(closed) => success(closed),
        None => error(AppError::NotFound(format!("Report {} not found", id))),
    }
}
