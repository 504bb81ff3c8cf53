//! # DomainError
//!
//! Centralized error handling for the post service layer.
//! Every use case fails with one of these kinds; the transport layer maps
//! them to responses through [`DomainError::status_code`].

use thiserror::Error;

/// The primary error type for all post use cases.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Looked-up resource is absent (post, favorite, author)
    #[error("{0}")]
    NotFound(String),

    /// Visibility, permission or field-restriction violation
    #[error("{0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate favorite)
    #[error("{0}")]
    Conflict(String),

    /// Entity construction rejected its input (e.g., blank title)
    #[error("validation error: {0}")]
    Validation(String),

    /// A persistence or lookup collaborator failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// HTTP-style status code carried by this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Validation(_) => 400,
            Self::Storage(_) => 500,
        }
    }
}

/// A specialized Result type for post use cases.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(DomainError::not_found("x").status_code(), 404);
        assert_eq!(DomainError::forbidden("x").status_code(), 403);
        assert_eq!(DomainError::conflict("x").status_code(), 409);
        assert_eq!(DomainError::Validation("x".into()).status_code(), 400);
        assert_eq!(
            DomainError::from(anyhow::anyhow!("db down")).status_code(),
            500
        );
    }

    #[test]
    fn message_is_displayed_verbatim() {
        let err = DomainError::not_found("Post was not found");
        assert_eq!(err.to_string(), "Post was not found");
    }
}
