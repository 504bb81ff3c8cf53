//! # Visibility & Permission Policy
//!
//! Pure decisions over (requester, resource). Every check returns `Ok` or the
//! `DomainError` the caller should propagate unchanged.

use domains::{DomainError, Post, PostPatch, PostStatus, Requester, Result, UserId};

pub const POST_NOT_FOUND: &str = "Post was not found";
pub const FAVORITE_NOT_FOUND: &str = "There was no such post in favorites";
pub const AUTHOR_NOT_FOUND: &str = "Author was not found";
pub const NO_PERMISSION: &str = "Forbidden. You have no permission for this operation";
pub const AUTHOR_ONLY_FIELDS: &str = "Forbidden. Only author can edit title and content";
pub const ALREADY_FAVORITE: &str = "Post is already in favorites";

/// Existence gate: unwraps a lookup result or fails with `NotFound(message)`.
pub fn ensure_exists<T>(found: Option<T>, message: &str) -> Result<T> {
    found.ok_or_else(|| DomainError::not_found(message))
}

/// INACTIVE posts are visible to their author and to admins only.
pub fn ensure_visible(post: &Post, requester: Option<&Requester>) -> Result<()> {
    if post.status == PostStatus::Active {
        return Ok(());
    }
    match requester {
        Some(r) if r.id == post.user_id || r.is_admin() => Ok(()),
        _ => {
            tracing::warn!(post_id = %post.id, "inactive post hidden from requester");
            Err(DomainError::forbidden(NO_PERMISSION))
        }
    }
}

/// Edit/delete permission: the owner or an admin. Returns the requester so
/// callers can keep using it without re-checking for anonymity.
pub fn ensure_can_modify(requester: Option<&Requester>, owner: UserId) -> Result<&Requester> {
    match requester {
        Some(r) if r.id == owner || r.is_admin() => Ok(r),
        _ => {
            tracing::warn!(%owner, "modification denied");
            Err(DomainError::forbidden(NO_PERMISSION))
        }
    }
}

/// Title and content stay author-only even for requesters who passed
/// [`ensure_can_modify`].
pub fn ensure_author_fields(
    requester: &Requester,
    author: UserId,
    patch: &PostPatch,
) -> Result<()> {
    if patch.touches_author_fields() && requester.id != author {
        tracing::warn!(requester = %requester.id, %author, "non-author edit of title/content");
        return Err(DomainError::forbidden(AUTHOR_ONLY_FIELDS));
    }
    Ok(())
}
