//! Comment tree node and the events its mutations emit.

use serde::{Deserialize, Serialize};

use super::{NotificationKind, Origin};

/// One node of a post's comment tree. A node exclusively owns its replies,
/// so removing it removes the whole subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Author identity. Provider comments carry the email the provider
    /// made up; local comments carry the session email.
    pub email: String,
    /// Display name chosen per comment, as the client's form does.
    pub name: String,
    pub body: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    pub origin: Origin,
}

impl Comment {
    /// Nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::subtree_len).sum::<usize>()
    }
}

/// Request body for a new top-level comment or a reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub name: String,
    pub body: String,
}

/// Request body for editing a comment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub body: String,
}

/// The two reaction toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl From<ReactionKind> for NotificationKind {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => NotificationKind::Like,
            ReactionKind::Dislike => NotificationKind::Dislike,
        }
    }
}

/// Emitted by tree mutations that should notify another user. The store
/// never writes notifications itself; the handler layer consumes these.
/// Only produced when the actor and the node's author differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub kind: NotificationKind,
    pub comment_id: String,
    pub from_user: String,
    pub to_user: String,
}

impl CommentEvent {
    /// Human-readable line shown on the notifications page.
    pub fn message(&self) -> String {
        match self.kind {
            NotificationKind::Reply => format!("{} replied to your comment", self.from_user),
            NotificationKind::Like => format!("{} liked your comment", self.from_user),
            NotificationKind::Dislike => format!("{} disliked your comment", self.from_user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Comment {
        Comment {
            id: id.into(),
            post_id: 1,
            parent_id: None,
            email: "a@b.c".into(),
            name: "A".into(),
            body: "hi".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
            edited_at: None,
            likes: vec![],
            dislikes: vec![],
            replies: vec![],
            origin: Origin::Local,
        }
    }

    #[test]
    fn subtree_len_counts_nested_replies() {
        let mut root = leaf("local-1");
        let mut child = leaf("local-2");
        child.replies.push(leaf("local-3"));
        root.replies.push(child);
        assert_eq!(root.subtree_len(), 3);
    }

    #[test]
    fn comment_wire_form_is_camel_case() {
        let c = leaf("local-9");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["postId"], 1);
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00Z");
        assert!(json.get("parentId").is_none());
        assert!(json.get("editedAt").is_none());
    }

    #[test]
    fn remote_comment_deserializes_without_reaction_fields() {
        let json = r#"{
            "id": "3",
            "postId": 1,
            "email": "Nikita@garfield.biz",
            "name": "odio adipisci",
            "body": "quia molestiae reprehenderit",
            "createdAt": "2026-01-01T00:00:00Z",
            "origin": "remote"
        }"#;
        let c: Comment = serde_json::from_str(json).unwrap();
        assert!(c.likes.is_empty());
        assert!(c.dislikes.is_empty());
        assert!(c.replies.is_empty());
        assert_eq!(c.origin, Origin::Remote);
    }

    #[test]
    fn event_messages_name_the_actor() {
        let event = CommentEvent {
            kind: NotificationKind::Like,
            comment_id: "local-1".into(),
            from_user: "mia@example.com".into(),
            to_user: "ana@example.com".into(),
        };
        assert_eq!(event.message(), "mia@example.com liked your comment");
    }
}
