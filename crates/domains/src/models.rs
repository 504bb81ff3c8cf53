//! # Domain Models
//!
//! These structs represent the core entities of the blog: posts, their
//! category links, favorites, and the read-only user/category projections
//! returned by the lookup collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Identity of a stored post.
    PostId
);
id_newtype!(
    /// Identity of a user (author, requester or favoriter).
    UserId
);
id_newtype!(
    /// Identity of a category.
    CategoryId
);

// ─── Enums ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    #[default]
    Active,
    Inactive,
}

impl PostStatus {
    pub const ACTIVE: &'static str = "ACTIVE";
    pub const INACTIVE: &'static str = "INACTIVE";

    /// Parses the exact wire marker. Anything else (including other casing) is rejected.
    pub fn from_marker(raw: &str) -> Option<Self> {
        match raw {
            Self::ACTIVE => Some(Self::Active),
            Self::INACTIVE => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Sort direction used by list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const ASC: &'static str = "ASC";
    pub const DESC: &'static str = "DESC";

    pub fn from_marker(raw: &str) -> Option<Self> {
        match raw {
            Self::ASC => Some(Self::Asc),
            Self::DESC => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// The identity performing a use case. Anonymous callers are modelled as
/// `Option<&Requester>::None` at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: UserId,
    pub role: Role,
}

impl Requester {
    pub fn user(id: UserId) -> Self {
        Self { id, role: Role::User }
    }

    pub fn admin(id: UserId) -> Self {
        Self { id, role: Role::Admin }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ─── Posts ────────────────────────────────────────────────────────────────

/// A post as stored by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub user_id: UserId,
    pub status: PostStatus,
    /// Aggregated score used by the `rating` sort
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns a copy of the post with the patch applied. Fields the patch
    /// leaves unset keep their current value.
    pub fn apply(self, patch: &PostPatch) -> Self {
        Self {
            title: patch.title.clone().unwrap_or(self.title),
            content: patch.content.clone().unwrap_or(self.content),
            status: patch.status.unwrap_or(self.status),
            ..self
        }
    }
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Builds a new ACTIVE post. Both title and content are required.
    pub fn create(title: &str, content: &str) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if content.trim().is_empty() {
            return Err(DomainError::Validation("content must not be empty".into()));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            status: PostStatus::Active,
            created_at: Utc::now(),
        })
    }
}

/// Field-by-field update. `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    /// True when the patch touches a field only the author may change.
    pub fn touches_author_fields(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostCategoryLink {
    pub post_id: PostId,
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

// ─── Lookup projections ───────────────────────────────────────────────────

/// Full user record as returned by the lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
}

/// Public projection of a user, safe to embed in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub login: String,
    pub avatar: Option<String>,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// The caller-facing post: stored fields plus its author and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub categories: Vec<Category>,
}

// ─── Queries ──────────────────────────────────────────────────────────────

/// Raw, untrusted list-query parameters as they arrive from the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub rating: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// Normalized list filter. `from`, `to` and `title` serialize as `null` when
/// rejected; `date` and `status` are left out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFilter {
    pub page: u64,
    pub rating: SortOrder,
    pub from: Option<String>,
    pub to: Option<String>,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            page: 1,
            rating: SortOrder::Desc,
            from: None,
            to: None,
            title: None,
            date: None,
            status: None,
        }
    }
}

// ─── Use-case inputs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub categories_to_add: Vec<CategoryId>,
    #[serde(default)]
    pub categories_to_delete: Vec<CategoryId>,
}

impl UpdatePostInput {
    /// Empty strings count as "not supplied", so a partial update can never
    /// blank out a title or content.
    pub fn patch(&self) -> PostPatch {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        PostPatch {
            title: non_empty(&self.title),
            content: non_empty(&self.content),
            status: self.is_active.map(PostStatus::from_active_flag),
        }
    }
}
