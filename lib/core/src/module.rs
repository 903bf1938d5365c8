use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, feed) implements this trait to register
/// its endpoints. The binary entry point collects all modules and merges
/// their routes into a single router. Routes come back already rooted
/// (e.g. `/auth/login`, `/post/{postId}`).
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// The module's routes, rooted at `/`.
    fn routes(&self) -> Router;
}
