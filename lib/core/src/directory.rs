//! Author projection seam.
//!
//! The feed module embeds a minimal author projection into every post and
//! comment it returns. It resolves that projection through this trait
//! rather than reaching into the identity store's tables directly.

use serde::Serialize;

use crate::ServiceError;

/// The author projection embedded into posts and comments.
///
/// Deliberately minimal: never the email, never the password digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Lookup of author projections by user id.
pub trait AuthorDirectory: Send + Sync {
    /// Resolve a user id to its author projection.
    ///
    /// Returns `Ok(None)` for unknown or malformed ids — absence is a
    /// normal outcome here, not an error.
    fn author(&self, id: &str) -> Result<Option<Author>, ServiceError>;
}
