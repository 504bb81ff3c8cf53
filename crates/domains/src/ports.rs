//! # Ports
//!
//! Contracts the post service needs from the outside world. Storage and
//! user/category lookup live behind these traits so adapters (SQL, in-memory,
//! mocks) can be swapped without touching the use cases.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{
    Category, CategoryId, Favorite, NewPost, Post, PostCategoryLink, PostFilter, PostId,
    Requester, User, UserId,
};

/// Data persistence contract for posts and their category links.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Returns the page of posts matching `filter`, optionally restricted to `ids`.
    /// The requester is forwarded for adapters that scope results per user.
    async fn find_all(
        &self,
        requester: Option<Requester>,
        ids: Option<Vec<PostId>>,
        filter: PostFilter,
    ) -> anyhow::Result<Vec<Post>>;

    /// All category links for the given posts, in one batched call.
    async fn find_post_category_links(
        &self,
        post_ids: Vec<PostId>,
    ) -> anyhow::Result<Vec<PostCategoryLink>>;

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>>;

    /// Persists a new post owned by `owner` and returns its id.
    async fn add(&self, post: &NewPost, owner: UserId) -> anyhow::Result<PostId>;

    async fn add_categories(
        &self,
        post_id: PostId,
        category_ids: Vec<CategoryId>,
    ) -> anyhow::Result<()>;

    async fn remove_categories(
        &self,
        post_id: PostId,
        category_ids: Vec<CategoryId>,
    ) -> anyhow::Result<()>;

    /// Full upsert of the mutable fields (title, content, status).
    async fn save(&self, post: &Post) -> anyhow::Result<()>;

    /// Hard delete.
    async fn remove(&self, id: PostId) -> anyhow::Result<()>;
}

/// Per-user favorite links. At most one link exists per (user, post).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<Option<Favorite>>;
    async fn add(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<()>;
    async fn remove(&self, user_id: UserId, post_id: PostId) -> anyhow::Result<()>;
}

/// Read-only lookups of users and categories by id.
///
/// Ids with no matching entity are simply absent from the returned maps.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn get_users(&self, ids: Vec<UserId>) -> anyhow::Result<HashMap<UserId, User>>;
    async fn get_categories(
        &self,
        ids: Vec<CategoryId>,
    ) -> anyhow::Result<HashMap<CategoryId, Category>>;
    async fn get_author(&self, id: UserId) -> anyhow::Result<Option<User>>;
}
