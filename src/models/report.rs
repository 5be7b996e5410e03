//! Moderation report model.

use serde::{Deserialize, Serialize};

/// What kind of content a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
    Post,
    Comment,
}

impl ReportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportTarget::Post => "post",
            ReportTarget::Comment => "comment",
        }
    }
}

/// Lifecycle of a report. Resolved reports leave the queue entirely, so
/// `Reviewed` is only ever observed mid-disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
}

/// A filed moderation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub target: ReportTarget,
    /// Post id rendered as a string, or a comment id.
    pub target_id: String,
    pub reporter_email: String,
    pub reported_user_email: String,
    pub reason: String,
    /// Snapshot of the offending text at filing time.
    pub content: String,
    pub status: ReportStatus,
    pub created_at: String,
}

/// Request body for filing a report. The reporter is the session identity,
/// never part of the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    pub target: ReportTarget,
    pub target_id: String,
    pub reported_user_email: String,
    pub reason: String,
    #[serde(default)]
    pub content: String,
}

/// What the reviewing admin decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    Delete,
    Block,
    Ignore,
}

impl ReportAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportAction::Delete => "delete",
            ReportAction::Block => "block",
            ReportAction::Ignore => "ignore",
        }
    }
}

/// Request body for reviewing a pending report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReportRequest {
    pub action: ReportAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_target_uses_type_on_the_wire() {
        let report = Report {
            id: "report-1".into(),
            target: ReportTarget::Comment,
            target_id: "local-2".into(),
            reporter_email: "mia@example.com".into(),
            reported_user_email: "ana@example.com".into(),
            reason: "spam".into(),
            content: "buy things".into(),
            status: ReportStatus::Pending,
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "comment");
        assert_eq!(json["targetId"], "local-2");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["reportedUserEmail"], "ana@example.com");
    }

    #[test]
    fn review_request_parses_actions() {
        let req: ReviewReportRequest = serde_json::from_str(r#"{"action":"block"}"#).unwrap();
        assert_eq!(req.action, ReportAction::Block);
        assert!(serde_json::from_str::<ReviewReportRequest>(r#"{"action":"nuke"}"#).is_err());
    }
}
