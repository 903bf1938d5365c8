mod comments;
mod posts;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use chirp_core::Authenticator;

use crate::service::FeedService;

/// Shared handler state: the feed service plus the request guard.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
    pub guard: Arc<dyn Authenticator>,
}

/// Build the feed routes, rooted at `/post` and `/comment`.
///
/// Reads are public; every mutation requires a bearer token, and
/// request-shape validation runs before the token is checked.
pub fn router(feed: Arc<FeedService>, guard: Arc<dyn Authenticator>) -> Router {
    Router::new()
        .route("/post", get(posts::list).post(posts::create))
        .route(
            "/post/{post_id}",
            get(posts::get_one).put(posts::update).delete(posts::remove),
        )
        .route("/post/user/{user_id}", get(posts::list_by_author))
        .route(
            "/post/{post_id}/like",
            post(posts::like).delete(posts::unlike),
        )
        .route(
            "/comment/post/{post_id}",
            get(comments::list).post(comments::create),
        )
        .route("/comment/{comment_id}", delete(comments::remove))
        .with_state(AppState { feed, guard })
}
