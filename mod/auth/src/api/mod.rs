use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use chirp_core::{created, from_body, ok, Authenticator, ServiceError};

use crate::service::AuthService;
use crate::validation;

pub type AppState = Arc<AuthService>;

/// Build the auth routes, rooted at `/auth`.
pub fn router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/{user_id}", get(get_user))
        .with_state(svc)
}

async fn register(
    State(svc): State<AppState>,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let input = validation::register(from_body(&body)?)?;
    let payload = svc.register(input)?;
    Ok(created("User registered successfully", payload))
}

async fn login(
    State(svc): State<AppState>,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let input = validation::login(from_body(&body)?)?;
    let payload = svc.login(input)?;
    Ok(ok("User logged in successfully", payload))
}

/// GET /auth/me — the caller's own profile, from the bearer token.
async fn me(
    State(svc): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let identity = svc.authenticate(&headers)?;
    let user = svc.get_user(&identity.user_id)?;
    Ok(ok(
        "User fetched successfully",
        serde_json::json!({ "user": user }),
    ))
}

/// GET /auth/{userId} — anyone's public profile.
async fn get_user(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::user_id(&user_id)?;
    let user = svc.get_user(&user_id)?;
    Ok(ok(
        "User fetched successfully",
        serde_json::json!({ "user": user }),
    ))
}
