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
    Path(post_id): Path<String>,
    body: Bytes,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let input = validation::comment_body(from_body(&body)?)?;
    let identity = state.guard.authenticate(&headers)?;
    let view = state
        .feed
        .create_comment(&post_id, &identity.user_id, input)?;
    Ok(created("Comment created successfully", view))
}

pub async fn list(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<RawPageQuery>,
) -> Result<Response, ServiceError> {
    validation::post_id(&post_id)?;
    let params = validation::page_params(&query, 20)?;
    let page = state.feed.list_comments(&post_id, &params)?;
    Ok(ok("Comments fetched successfully", page))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
) -> Result<Response, ServiceError> {
    validation::comment_id(&comment_id)?;
    let identity = state.guard.authenticate(&headers)?;
    state.feed.delete_comment(&comment_id, &identity.user_id)?;
    Ok(message_only("Comment deleted successfully"))
}
