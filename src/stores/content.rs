//! Content store: the merged post list and the provider author personas.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Author, CreatePostRequest, Origin, Post, UpdatePostRequest};
use crate::storage::{slots, SlotStore};
use crate::stores::MillisSequencer;

const SLOT: &str = slots::POSTS;

/// Post service. The persisted slot is the bare post list, matching the
/// shape the browser client stored; author personas are held in memory
/// only and vanish on restart.
pub struct ContentStore {
    posts: RwLock<Vec<Post>>,
    authors: RwLock<Vec<Author>>,
    slots: SlotStore,
    seq: Arc<MillisSequencer>,
}

impl ContentStore {
    pub async fn open(store: SlotStore, seq: Arc<MillisSequencer>) -> Result<Self, AppError> {
        let posts: Vec<Post> = store.read_slot_or_default(SLOT).await?;
        Ok(Self {
            posts: RwLock::new(posts),
            authors: RwLock::new(Vec::new()),
            slots: store,
            seq,
        })
    }

    /// Merge the startup provider fetch into the persisted list. Local
    /// records win on id collisions; provider records fill the gaps and
    /// are appended after everything already known. None means the
    /// provider was unreachable and the local list stands as-is.
    pub async fn initialize(
        &self,
        fetched: Option<(Vec<Post>, Vec<Author>)>,
    ) -> Result<(), AppError> {
        let Some((remote_posts, remote_authors)) = fetched else {
            return Ok(());
        };

        {
            let mut authors = self.authors.write().await;
            *authors = remote_authors;
        }

        let mut posts = self.posts.write().await;
        let mut added = 0;
        for post in remote_posts {
            if !posts.iter().any(|p| p.id == post.id) {
                posts.push(post);
                added += 1;
            }
        }
        tracing::info!(added, total = posts.len(), "merged provider posts");
        self.persist(&posts).await
    }

    /// Create a local post, newest first.
    pub async fn add_post(
        &self,
        request: &CreatePostRequest,
        creator: &str,
    ) -> Result<Post, AppError> {
        let user_id = match request.user_id {
            Some(id) => id,
            None => self.authors.read().await.first().map(|a| a.id).unwrap_or(11),
        };

        let post = Post {
            id: self.seq.next(),
            user_id,
            title: request.title.clone(),
            body: request.body.clone(),
            category: request.category.clone(),
            creator_email: creator.to_string(),
            origin: Origin::Local,
        };

        let mut posts = self.posts.write().await;
        posts.insert(0, post.clone());
        self.persist(&posts).await?;
        Ok(post)
    }

    /// Edit a post. Missing ids are silent no-ops; editing someone
    /// else's post is refused here, not in the handlers.
    pub async fn update_post(
        &self,
        id: i64,
        request: &UpdatePostRequest,
        acting: &str,
    ) -> Result<Option<Post>, AppError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if post.creator_email != acting {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        if let Some(title) = &request.title {
            post.title = title.clone();
        }
        if let Some(body) = &request.body {
            post.body = body.clone();
        }
        if let Some(category) = &request.category {
            post.category = category.clone();
        }
        let updated = post.clone();
        self.persist(&posts).await?;
        Ok(Some(updated))
    }

    /// Delete by id, no questions asked. Callers decide who may.
    pub async fn remove(&self, id: i64) -> Result<bool, AppError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.persist(&posts).await?;
        Ok(true)
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn post(&self, id: i64) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn posts_by(&self, creator: &str) -> Vec<Post> {
        self.posts
            .read()
            .await
            .iter()
            .filter(|p| p.creator_email == creator)
            .cloned()
            .collect()
    }

    pub async fn posts_with_ids(&self, ids: &[i64]) -> Vec<Post> {
        self.posts
            .read()
            .await
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect()
    }

    pub async fn authors(&self) -> Vec<Author> {
        self.authors.read().await.clone()
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, &posts).await
    }
}
