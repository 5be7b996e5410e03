//! Read-only client for the upstream content provider.
//!
//! The provider serves seed posts, author personas, and per-post comment
//! pages. It is never written to, and it is allowed to be down: callers
//! get `None` and carry on with local data.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    category_for_remote, Author, Comment, Origin, Post, REMOTE_CREATOR_EMAIL,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPost {
    user_id: i64,
    id: i64,
    title: String,
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUser {
    id: i64,
    name: String,
    username: String,
    email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderComment {
    post_id: i64,
    id: i64,
    name: String,
    email: String,
    body: String,
}

impl From<ProviderPost> for Post {
    fn from(post: ProviderPost) -> Self {
        Post {
            category: category_for_remote(post.id).to_string(),
            creator_email: REMOTE_CREATOR_EMAIL.to_string(),
            origin: Origin::Remote,
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
        }
    }
}

impl From<ProviderUser> for Author {
    fn from(user: ProviderUser) -> Self {
        Author {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
        }
    }
}

impl From<ProviderComment> for Comment {
    fn from(comment: ProviderComment) -> Self {
        Comment {
            id: comment.id.to_string(),
            post_id: comment.post_id,
            parent_id: None,
            email: comment.email,
            name: comment.name,
            body: comment.body,
            created_at: Utc::now().to_rfc3339(),
            edited_at: None,
            likes: Vec::new(),
            dislikes: Vec::new(),
            replies: Vec::new(),
            origin: Origin::Remote,
        }
    }
}

/// The provider client. `base_url` is None when fetching is disabled.
#[derive(Clone)]
pub struct ContentProvider {
    client: Client,
    base_url: Option<String>,
}

impl ContentProvider {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.provider_timeout).build()?;
        let base_url = config
            .provider_enabled()
            .then(|| config.provider_url.trim_end_matches('/').to_string());
        Ok(Self { client, base_url })
    }

    /// The startup fetch: seed posts and author personas. None when the
    /// provider is disabled or unreachable.
    pub async fn fetch_bootstrap(&self) -> Option<(Vec<Post>, Vec<Author>)> {
        let base = self.base_url.as_deref()?;
        match self.fetch_bootstrap_inner(base).await {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!("Provider unreachable, serving local posts only: {}", err);
                None
            }
        }
    }

    async fn fetch_bootstrap_inner(
        &self,
        base: &str,
    ) -> Result<(Vec<Post>, Vec<Author>), AppError> {
        let posts: Vec<ProviderPost> = self.get_json(&format!("{base}/posts")).await?;
        let users: Vec<ProviderUser> = self.get_json(&format!("{base}/users")).await?;
        Ok((
            posts.into_iter().map(Post::from).collect(),
            users.into_iter().map(Author::from).collect(),
        ))
    }

    /// One post's comment page. None when the provider is disabled or
    /// unreachable; the caller keeps whatever it already has.
    pub async fn fetch_comments(&self, post_id: i64) -> Option<Vec<Comment>> {
        let base = self.base_url.as_deref()?;
        let url = format!("{base}/comments?postId={post_id}");
        match self.get_json::<Vec<ProviderComment>>(&url).await {
            Ok(comments) => Some(comments.into_iter().map(Comment::from).collect()),
            Err(err) => {
                tracing::warn!(
                    "Comment fetch for post {} failed, keeping local comments: {}",
                    post_id,
                    err
                );
                None
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_post_becomes_a_remote_post() {
        let json = r#"{"userId": 1, "id": 7, "title": "qui est esse", "body": "est rerum"}"#;
        let dto: ProviderPost = serde_json::from_str(json).unwrap();
        let post = Post::from(dto);
        assert_eq!(post.id, 7);
        assert_eq!(post.origin, Origin::Remote);
        assert_eq!(post.creator_email, REMOTE_CREATOR_EMAIL);
        assert_eq!(post.category, category_for_remote(7));
    }

    #[test]
    fn provider_comment_becomes_a_remote_root() {
        let json = r#"{
            "postId": 1,
            "id": 3,
            "name": "odio adipisci rerum",
            "email": "Nikita@garfield.biz",
            "body": "quia molestiae reprehenderit"
        }"#;
        let dto: ProviderComment = serde_json::from_str(json).unwrap();
        let comment = Comment::from(dto);
        assert_eq!(comment.id, "3");
        assert_eq!(comment.post_id, 1);
        assert!(comment.parent_id.is_none());
        assert_eq!(comment.origin, Origin::Remote);
        assert!(comment.likes.is_empty() && comment.replies.is_empty());
    }

    #[test]
    fn disabled_provider_has_no_base_url() {
        let config = Config {
            db_path: std::path::PathBuf::from(":memory:"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".into(),
            provider_url: "  ".into(),
            provider_timeout: std::time::Duration::from_secs(1),
            admin_email: "admin@example.com".into(),
        };
        let provider = ContentProvider::new(&config).unwrap();
        assert!(provider.base_url.is_none());
    }

    #[tokio::test]
    async fn disabled_provider_fetches_nothing() {
        let config = Config {
            db_path: std::path::PathBuf::from(":memory:"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".into(),
            provider_url: String::new(),
            provider_timeout: std::time::Duration::from_secs(1),
            admin_email: "admin@example.com".into(),
        };
        let provider = ContentProvider::new(&config).unwrap();
        assert!(provider.fetch_bootstrap().await.is_none());
        assert!(provider.fetch_comments(1).await.is_none());
    }
}
