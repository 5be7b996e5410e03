//! Post model and the fixed category list.

use serde::{Deserialize, Serialize};

/// Where a record came from: written through this store, or fetched from
/// the upstream content provider. Only local records accept mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Local,
    Remote,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Local => "local",
            Origin::Remote => "remote",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Origin::Local)
    }
}

/// The categories a post can carry.
pub const CATEGORIES: [&str; 5] = ["Technology", "Travel", "Food", "Lifestyle", "Business"];

/// Category assigned to a provider post. Derived from the id so repeated
/// merges label the same post the same way.
pub fn category_for_remote(id: i64) -> &'static str {
    CATEGORIES[id.unsigned_abs() as usize % CATEGORIES.len()]
}

/// Email attached to provider posts, which arrive without a creator.
pub const REMOTE_CREATOR_EMAIL: &str = "api@gmail.com";

/// A blog post, locally written or merged in from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub category: String,
    pub creator_email: String,
    pub origin: Origin,
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub category: String,
    /// Author persona to attribute the post to; defaults to the first
    /// provider persona when omitted.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Request body for updating an existing post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Response body for the favorite toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggleResponse {
    pub post_id: i64,
    /// Whether the post is favorited after the toggle.
    pub favorited: bool,
}
