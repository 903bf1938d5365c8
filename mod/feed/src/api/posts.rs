use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use chirp_core::{created, from_body, message_only, ok, ServiceError};

use crate::api::AppState;
use crate::validation::{self, RawPageQuery};

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let input = validation::post_body(from_body(&body)?)?;
    let identity = state.guard.authenticate(&headers)?;
    let view = state.feed.create_post(&identity.user_id, input)?;
    Ok(created("Post created successfully", view))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RawPageQuery>,
) -> Result<Response, ServiceError> {
    let params = validation::page_params(&query, 10)?;
    let page = state.feed.list_posts(&params)?;
    Ok(ok("Posts fetched successfully", page))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let view = state.feed.get_post(&post_id)?;
    Ok(ok("Post fetched successfully", view))
}

pub async fn list_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RawPageQuery>,
) -> Result<Response, ServiceError> {
    validation::user_id(&user_id)?;
    let params = validation::page_params(&query, 10)?;
    let page = state.feed.list_posts_by_author(&user_id, &params)?;
    Ok(ok("Posts fetched successfully", page))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    body: Bytes,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let input = validation::post_body(from_body(&body)?)?;
    let identity = state.guard.authenticate(&headers)?;
    let view = state.feed.update_post(&post_id, &identity.user_id, input)?;
    Ok(ok("Post updated successfully", view))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let identity = state.guard.authenticate(&headers)?;
    state.feed.delete_post(&post_id, &identity.user_id)?;
    Ok(message_only("Post deleted successfully"))
}

pub async fn like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let identity = state.guard.authenticate(&headers)?;
    let view = state.feed.like_post(&post_id, &identity.user_id)?;
    Ok(ok("Post liked successfully", view))
}

pub async fn unlike(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let identity = state.guard.authenticate(&headers)?;
    let view = state.feed.unlike_post(&post_id, &identity.user_id)?;
    Ok(ok("Post unliked successfully", view))
}
