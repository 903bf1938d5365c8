//! Authorization guard seam.
//!
//! Route handlers do not depend on a specific credential implementation;
//! they call this trait. The concrete implementation (JWT verification in
//! the auth module) is injected at startup.

use axum::http::HeaderMap;

use crate::ServiceError;

/// The authenticated caller, resolved from a bearer token.
///
/// This is what downstream ownership checks compare against. It never
/// carries more than the token claims (no password digest, no profile).
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

/// Pluggable authenticator. Called by every handler that requires a
/// caller identity, after request validation and before any store access.
pub trait Authenticator: Send + Sync {
    /// Resolve the caller from the `Authorization: Bearer <token>` header.
    ///
    /// Fails with `Unauthenticated` if the header is absent or malformed,
    /// or if the token does not verify.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ServiceError>;
}
