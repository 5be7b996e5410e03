//! Comment tree store: an owned forest of threaded comments with
//! reaction toggles, merge-on-fetch for provider comments, and removal
//! tombstones so moderated remote comments stay gone.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{
    Comment, CommentEvent, CreateCommentRequest, NotificationKind, Origin, ReactionKind,
};
use crate::storage::{slots, SlotStore};
use crate::stores::MillisSequencer;

const SLOT: &str = slots::COMMENTS;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentsState {
    /// Top-level comments across all posts, each owning its reply subtree.
    comments: Vec<Comment>,
    /// Remote ids removed by moderation. Merge-on-fetch skips these.
    removed_remote: Vec<String>,
}

/// Comment service. Ownership and origin rules live here, so every
/// caller gets the same refusals.
pub struct CommentStore {
    state: RwLock<CommentsState>,
    slots: SlotStore,
    seq: Arc<MillisSequencer>,
}

impl CommentStore {
    pub async fn open(store: SlotStore, seq: Arc<MillisSequencer>) -> Result<Self, AppError> {
        let state: CommentsState = store.read_slot_or_default(SLOT).await?;
        Ok(Self {
            state: RwLock::new(state),
            slots: store,
            seq,
        })
    }

    /// Append a new top-level comment for a post.
    pub async fn add_top_level(
        &self,
        post_id: i64,
        request: &CreateCommentRequest,
        author: &str,
    ) -> Result<Comment, AppError> {
        let comment = self.new_node(post_id, None, request, author);
        let mut state = self.state.write().await;
        state.comments.push(comment.clone());
        self.persist(&state).await?;
        Ok(comment)
    }

    /// Merge provider comments for one post into the forest. Nodes whose
    /// id is already present anywhere, or was tombstoned, are skipped;
    /// everything else lands appended as a top-level comment. Returns how
    /// many were added.
    pub async fn ingest_remote(&self, remote: Vec<Comment>) -> Result<usize, AppError> {
        let mut state = self.state.write().await;
        let mut added = 0;
        for comment in remote {
            let known = find_node(&state.comments, &comment.id).is_some();
            let tombstoned = state.removed_remote.iter().any(|id| id == &comment.id);
            if !known && !tombstoned {
                state.comments.push(comment);
                added += 1;
            }
        }
        if added > 0 {
            self.persist(&state).await?;
        }
        Ok(added)
    }

    /// Attach a reply under a parent. A vanished parent is a silent
    /// no-op; replying under a provider comment is refused. Emits a
    /// reply event when the parent belongs to someone else.
    pub async fn add_reply(
        &self,
        parent_id: &str,
        request: &CreateCommentRequest,
        author: &str,
    ) -> Result<(Option<Comment>, Vec<CommentEvent>), AppError> {
        let mut state = self.state.write().await;
        let Some(parent) = find_node_mut(&mut state.comments, parent_id) else {
            return Ok((None, Vec::new()));
        };
        if !parent.origin.is_local() {
            return Err(AppError::Forbidden(
                "Only locally created comments can be replied to".to_string(),
            ));
        }

        let reply = self.new_node(parent.post_id, Some(parent.id.clone()), request, author);
        let parent_author = parent.email.clone();
        parent.replies.push(reply.clone());

        let mut events = Vec::new();
        if parent_author != author {
            events.push(CommentEvent {
                kind: NotificationKind::Reply,
                comment_id: reply.id.clone(),
                from_user: author.to_string(),
                to_user: parent_author,
            });
        }
        self.persist(&state).await?;
        Ok((Some(reply), events))
    }

    /// Rewrite a comment's body and stamp it edited. Only the author of
    /// a local comment may.
    pub async fn edit(
        &self,
        id: &str,
        body: &str,
        acting: &str,
    ) -> Result<Option<Comment>, AppError> {
        let mut state = self.state.write().await;
        let Some(node) = find_node_mut(&mut state.comments, id) else {
            return Ok(None);
        };
        if !node.origin.is_local() {
            return Err(AppError::Forbidden(
                "Only locally created comments can be edited".to_string(),
            ));
        }
        if node.email != acting {
            return Err(AppError::Forbidden(
                "You can only edit your own comments".to_string(),
            ));
        }

        node.body = body.to_string();
        node.edited_at = Some(Utc::now().to_rfc3339());
        let updated = node.clone();
        self.persist(&state).await?;
        Ok(Some(updated))
    }

    /// Remove a comment and its entire subtree. Only the author of a
    /// local comment may; missing ids are silent no-ops.
    pub async fn delete_own(&self, id: &str, acting: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let Some(node) = find_node(&state.comments, id) else {
            return Ok(false);
        };
        if !node.origin.is_local() {
            return Err(AppError::Forbidden(
                "Only locally created comments can be deleted".to_string(),
            ));
        }
        if node.email != acting {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        let removed = remove_node(&mut state.comments, id).is_some();
        self.persist(&state).await?;
        Ok(removed)
    }

    /// Moderation removal: takes out any comment regardless of origin or
    /// author, tombstoning remote ids so the next merge cannot bring
    /// them back.
    pub async fn moderate_remove(&self, id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let Some(removed) = remove_node(&mut state.comments, id) else {
            return Ok(false);
        };
        collect_remote_ids(&removed, &mut state.removed_remote);
        self.persist(&state).await?;
        Ok(true)
    }

    /// Toggle a reaction. Adding one side always clears the other for
    /// that identity. Emits an event only when the toggle newly added
    /// the reaction and the comment belongs to someone else.
    pub async fn react(
        &self,
        id: &str,
        kind: ReactionKind,
        acting: &str,
    ) -> Result<(Option<Comment>, Vec<CommentEvent>), AppError> {
        let mut state = self.state.write().await;
        let Some(node) = find_node_mut(&mut state.comments, id) else {
            return Ok((None, Vec::new()));
        };
        if !node.origin.is_local() {
            return Err(AppError::Forbidden(
                "Only locally created comments can be reacted to".to_string(),
            ));
        }

        let (chosen, opposite) = match kind {
            ReactionKind::Like => (&mut node.likes, &mut node.dislikes),
            ReactionKind::Dislike => (&mut node.dislikes, &mut node.likes),
        };

        let newly_added = if chosen.iter().any(|e| e == acting) {
            chosen.retain(|e| e != acting);
            false
        } else {
            chosen.push(acting.to_string());
            opposite.retain(|e| e != acting);
            true
        };

        let author = node.email.clone();
        let updated = node.clone();

        let mut events = Vec::new();
        if newly_added && author != acting {
            events.push(CommentEvent {
                kind: kind.into(),
                comment_id: updated.id.clone(),
                from_user: acting.to_string(),
                to_user: author,
            });
        }
        self.persist(&state).await?;
        Ok((Some(updated), events))
    }

    /// The comment trees of one post, in insertion order.
    pub async fn trees_for_post(&self, post_id: i64) -> Vec<Comment> {
        self.state
            .read()
            .await
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    /// Every comment a user wrote, at any depth, flattened. Each entry
    /// is the node alone, with its replies stripped.
    pub async fn comments_by(&self, author: &str) -> Vec<Comment> {
        let state = self.state.read().await;
        let mut found = Vec::new();
        collect_by_author(&state.comments, author, &mut found);
        found
    }

    fn new_node(
        &self,
        post_id: i64,
        parent_id: Option<String>,
        request: &CreateCommentRequest,
        author: &str,
    ) -> Comment {
        Comment {
            id: format!("local-{}", self.seq.next()),
            post_id,
            parent_id,
            email: author.to_string(),
            name: request.name.clone(),
            body: request.body.clone(),
            created_at: Utc::now().to_rfc3339(),
            edited_at: None,
            likes: Vec::new(),
            dislikes: Vec::new(),
            replies: Vec::new(),
            origin: Origin::Local,
        }
    }

    async fn persist(&self, state: &CommentsState) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, state).await
    }
}

fn find_node<'a>(nodes: &'a [Comment], id: &str) -> Option<&'a Comment> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<'a>(nodes: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Detach the node with the given id, subtree and all.
fn remove_node(nodes: &mut Vec<Comment>, id: &str) -> Option<Comment> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in nodes {
        if let Some(removed) = remove_node(&mut node.replies, id) {
            return Some(removed);
        }
    }
    None
}

fn collect_remote_ids(node: &Comment, acc: &mut Vec<String>) {
    if !node.origin.is_local() {
        acc.push(node.id.clone());
    }
    for reply in &node.replies {
        collect_remote_ids(reply, acc);
    }
}

fn collect_by_author(nodes: &[Comment], author: &str, acc: &mut Vec<Comment>) {
    for node in nodes {
        if node.email == author {
            let mut flat = node.clone();
            flat.replies = Vec::new();
            acc.push(flat);
        }
        collect_by_author(&node.replies, author, acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init_database;

    async fn open_store() -> (tempfile::TempDir, CommentStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("test.sqlite")).await.unwrap();
        let store = CommentStore::open(SlotStore::new(pool), Arc::new(MillisSequencer::new()))
            .await
            .unwrap();
        (dir, store)
    }

    fn request(name: &str, body: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            name: name.into(),
            body: body.into(),
        }
    }

    fn remote(id: &str, post_id: i64) -> Comment {
        Comment {
            id: id.into(),
            post_id,
            parent_id: None,
            email: "Nikita@garfield.biz".into(),
            name: "odio adipisci".into(),
            body: "provider text".into(),
            created_at: Utc::now().to_rfc3339(),
            edited_at: None,
            likes: Vec::new(),
            dislikes: Vec::new(),
            replies: Vec::new(),
            origin: Origin::Remote,
        }
    }

    #[tokio::test]
    async fn top_level_comments_get_local_ids() {
        let (_dir, store) = open_store().await;
        let c = store
            .add_top_level(1, &request("Mia", "first!"), "mia@example.com")
            .await
            .unwrap();
        assert!(c.id.starts_with("local-"));
        assert_eq!(c.origin, Origin::Local);
        assert!(c.parent_id.is_none());
        assert_eq!(store.trees_for_post(1).await.len(), 1);
    }

    #[tokio::test]
    async fn rapid_comments_never_share_an_id() {
        let (_dir, store) = open_store().await;
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let c = store
                .add_top_level(1, &request("Mia", &format!("c{i}")), "mia@example.com")
                .await
                .unwrap();
            assert!(ids.insert(c.id));
        }
    }

    #[tokio::test]
    async fn ingest_skips_known_and_tombstoned_ids() {
        let (_dir, store) = open_store().await;
        let added = store
            .ingest_remote(vec![remote("3", 1), remote("4", 1)])
            .await
            .unwrap();
        assert_eq!(added, 2);

        // Same fetch again: nothing new.
        let added = store
            .ingest_remote(vec![remote("3", 1), remote("4", 1)])
            .await
            .unwrap();
        assert_eq!(added, 0);

        store.moderate_remove("4").await.unwrap();
        let added = store.ingest_remote(vec![remote("4", 1)]).await.unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.trees_for_post(1).await.len(), 1);
    }

    #[tokio::test]
    async fn reply_notifies_the_parent_author_only() {
        let (_dir, store) = open_store().await;
        let parent = store
            .add_top_level(1, &request("Ana", "hello"), "ana@example.com")
            .await
            .unwrap();

        let (reply, events) = store
            .add_reply(&parent.id, &request("Mia", "hi back"), "mia@example.com")
            .await
            .unwrap();
        let reply = reply.unwrap();
        assert_eq!(reply.parent_id.as_deref(), Some(parent.id.as_str()));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Reply);
        assert_eq!(events[0].to_user, "ana@example.com");
        assert_eq!(events[0].from_user, "mia@example.com");

        // Replying to yourself stays quiet.
        let (_, events) = store
            .add_reply(&parent.id, &request("Ana", "me again"), "ana@example.com")
            .await
            .unwrap();
        assert!(events.is_empty());

        let trees = store.trees_for_post(1).await;
        assert_eq!(trees[0].replies.len(), 2);
    }

    #[tokio::test]
    async fn replying_to_a_vanished_parent_is_a_silent_no_op() {
        let (_dir, store) = open_store().await;
        let (reply, events) = store
            .add_reply("local-404", &request("Mia", "hi"), "mia@example.com")
            .await
            .unwrap();
        assert!(reply.is_none());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn remote_comments_refuse_replies_edits_and_reactions() {
        let (_dir, store) = open_store().await;
        store.ingest_remote(vec![remote("3", 1)]).await.unwrap();

        let err = store
            .add_reply("3", &request("Mia", "hi"), "mia@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = store.edit("3", "defaced", "mia@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = store
            .react("3", ReactionKind::Like, "mia@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = store.delete_own("3", "mia@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn edit_stamps_edited_at_and_checks_the_author() {
        let (_dir, store) = open_store().await;
        let c = store
            .add_top_level(1, &request("Mia", "tpyo"), "mia@example.com")
            .await
            .unwrap();
        assert!(c.edited_at.is_none());

        let err = store.edit(&c.id, "hijack", "eve@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = store
            .edit(&c.id, "typo", "mia@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body, "typo");
        assert!(updated.edited_at.is_some());

        assert!(store.edit("local-404", "x", "mia@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_takes_the_whole_subtree() {
        let (_dir, store) = open_store().await;
        let root = store
            .add_top_level(1, &request("Mia", "root"), "mia@example.com")
            .await
            .unwrap();
        let (child, _) = store
            .add_reply(&root.id, &request("Ana", "child"), "ana@example.com")
            .await
            .unwrap();
        let child = child.unwrap();
        store
            .add_reply(&child.id, &request("Mia", "grandchild"), "mia@example.com")
            .await
            .unwrap();

        let err = store.delete_own(&root.id, "ana@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(store.delete_own(&root.id, "mia@example.com").await.unwrap());
        assert!(store.trees_for_post(1).await.is_empty());

        // The nested reply went down with the subtree.
        assert!(store.comments_by("ana@example.com").await.is_empty());

        assert!(!store.delete_own(&root.id, "mia@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn moderation_removes_anything() {
        let (_dir, store) = open_store().await;
        let c = store
            .add_top_level(1, &request("Mia", "rude"), "mia@example.com")
            .await
            .unwrap();
        assert!(store.moderate_remove(&c.id).await.unwrap());
        assert!(!store.moderate_remove(&c.id).await.unwrap());
    }

    #[tokio::test]
    async fn like_toggles_and_clears_the_dislike() {
        let (_dir, store) = open_store().await;
        let c = store
            .add_top_level(1, &request("Ana", "hot take"), "ana@example.com")
            .await
            .unwrap();

        let (updated, events) = store
            .react(&c.id, ReactionKind::Dislike, "mia@example.com")
            .await
            .unwrap();
        let updated = updated.unwrap();
        assert_eq!(updated.dislikes, vec!["mia@example.com"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Dislike);

        // Switching sides moves the identity between the sets.
        let (updated, events) = store
            .react(&c.id, ReactionKind::Like, "mia@example.com")
            .await
            .unwrap();
        let updated = updated.unwrap();
        assert_eq!(updated.likes, vec!["mia@example.com"]);
        assert!(updated.dislikes.is_empty());
        assert_eq!(events.len(), 1);

        // Toggling off removes the reaction and stays quiet.
        let (updated, events) = store
            .react(&c.id, ReactionKind::Like, "mia@example.com")
            .await
            .unwrap();
        assert!(updated.unwrap().likes.is_empty());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn reacting_to_your_own_comment_stays_quiet() {
        let (_dir, store) = open_store().await;
        let c = store
            .add_top_level(1, &request("Ana", "self five"), "ana@example.com")
            .await
            .unwrap();
        let (updated, events) = store
            .react(&c.id, ReactionKind::Like, "ana@example.com")
            .await
            .unwrap();
        assert_eq!(updated.unwrap().likes, vec!["ana@example.com"]);
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn reacting_to_a_missing_comment_is_a_silent_no_op() {
        let (_dir, store) = open_store().await;
        let (updated, events) = store
            .react("local-404", ReactionKind::Like, "mia@example.com")
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn comments_by_flattens_every_depth() {
        let (_dir, store) = open_store().await;
        let root = store
            .add_top_level(1, &request("Mia", "root"), "mia@example.com")
            .await
            .unwrap();
        let (child, _) = store
            .add_reply(&root.id, &request("Ana", "child"), "ana@example.com")
            .await
            .unwrap();
        store
            .add_reply(&child.unwrap().id, &request("Mia", "deep"), "mia@example.com")
            .await
            .unwrap();

        let mine = store.comments_by("mia@example.com").await;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.replies.is_empty()));
    }

    #[tokio::test]
    async fn forest_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("test.sqlite")).await.unwrap();
        let seq = Arc::new(MillisSequencer::new());
        let root_id;
        {
            let store = CommentStore::open(SlotStore::new(pool.clone()), seq.clone())
                .await
                .unwrap();
            let root = store
                .add_top_level(1, &request("Mia", "root"), "mia@example.com")
                .await
                .unwrap();
            root_id = root.id.clone();
            store
                .add_reply(&root.id, &request("Ana", "child"), "ana@example.com")
                .await
                .unwrap();
        }
        let store = CommentStore::open(SlotStore::new(pool), seq).await.unwrap();
        let trees = store.trees_for_post(1).await;
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].id, root_id);
        assert_eq!(trees[0].replies.len(), 1);
    }
}
