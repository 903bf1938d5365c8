//! End-to-end scenario over the real services wired the way the binary
//! wires them: one shared store, the auth service doubling as guard and
//! author directory.

use std::sync::Arc;

use axum::http::HeaderMap;

use auth::model::{LoginInput, RegisterInput};
use auth::service::{AuthConfig, AuthService};
use chirp_core::{Authenticator, AuthorDirectory, PageParams, ServiceError};
use chirp_sql::{SqliteStore, SqlStore};
use feed::model::{CommentInput, PostInput};
use feed::service::FeedService;

struct World {
    auth: Arc<AuthService>,
    feed: Arc<FeedService>,
}

fn world() -> World {
    let sql: Arc<dyn SqlStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let auth = AuthService::new(Arc::clone(&sql), AuthConfig::default()).unwrap();
    let authors: Arc<dyn AuthorDirectory> = auth.clone();
    let feed = FeedService::new(sql, authors).unwrap();
    World { auth, feed }
}

fn register(auth: &AuthService, name: &str) -> (String, String) {
    let payload = auth
        .register(RegisterInput {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password: "correct-horse-battery".to_string(),
        })
        .unwrap();
    (payload.user.id, payload.token)
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        format!("Bearer {}", token).parse().unwrap(),
    );
    headers
}

#[test]
fn post_lifecycle_with_two_users() {
    let w = world();
    let (alice_id, alice_token) = register(&w.auth, "alice");
    let (bob_id, _) = register(&w.auth, "bob");

    // Tokens resolve back to the registered identity.
    let identity = w.auth.authenticate(&bearer(&alice_token)).unwrap();
    assert_eq!(identity.user_id, alice_id);

    // Alice posts; the view embeds her author projection.
    let post = w
        .feed
        .create_post(
            &alice_id,
            PostInput {
                content: "first chirp".to_string(),
                images: None,
            },
        )
        .unwrap();
    assert_eq!(post.author.username, "alice");

    // The feed lists it first.
    let listed = w
        .feed
        .list_posts(&PageParams { page: 1, limit: 10 })
        .unwrap();
    assert_eq!(listed.data[0].id, post.id);
    assert_eq!(listed.pagination.total_items, 1);

    // Bob likes it; the like-set names him exactly once.
    let liked = w.feed.like_post(&post.id, &bob_id).unwrap();
    assert_eq!(liked.likes, vec![bob_id.clone()]);
    assert_eq!(liked.likes_count, 1);
    assert!(matches!(
        w.feed.like_post(&post.id, &bob_id).unwrap_err(),
        ServiceError::AlreadyLiked
    ));

    // Bob comments; the post's live count follows.
    w.feed
        .create_comment(
            &post.id,
            &bob_id,
            CommentInput {
                content: "nice one".to_string(),
            },
        )
        .unwrap();
    assert_eq!(w.feed.get_post(&post.id).unwrap().comments_count, 1);

    // Bob cannot delete Alice's post.
    assert!(matches!(
        w.feed.delete_post(&post.id, &bob_id).unwrap_err(),
        ServiceError::Forbidden(_)
    ));

    // Bob unlikes, then Alice deletes; the feed is empty again.
    let unliked = w.feed.unlike_post(&post.id, &bob_id).unwrap();
    assert_eq!(unliked.likes_count, 0);

    w.feed.delete_post(&post.id, &alice_id).unwrap();
    let listed = w
        .feed
        .list_posts(&PageParams { page: 1, limit: 10 })
        .unwrap();
    assert!(listed.data.is_empty());
}

#[test]
fn login_round_trip_authenticates() {
    let w = world();
    register(&w.auth, "carol");

    let payload = w
        .auth
        .login(LoginInput {
            email: "carol@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
        })
        .unwrap();
    let identity = w.auth.authenticate(&bearer(&payload.token)).unwrap();
    assert_eq!(identity.email, "carol@example.com");
}

#[test]
fn missing_and_garbage_tokens_are_rejected() {
    let w = world();

    let err = w.auth.authenticate(&HeaderMap::new()).unwrap_err();
    assert_eq!(err.to_string(), "No token provided");

    let err = w.auth.authenticate(&bearer("garbage")).unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated(_)));
}
