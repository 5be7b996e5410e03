//! Notification model for the per-user activity feed.

use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reply,
    Like,
    Dislike,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Reply => "reply",
            NotificationKind::Like => "like",
            NotificationKind::Dislike => "dislike",
        }
    }
}

/// One entry of the activity feed. Immutable after creation except for
/// the read flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub comment_id: String,
    pub from_user: String,
    pub to_user: String,
    pub message: String,
    pub read: bool,
    pub timestamp: String,
}

/// Response body for the unread badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: usize,
}
