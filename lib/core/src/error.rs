use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Whether raw internal error messages are passed through to clients.
/// Off by default; the binary enables it for development deployments.
static DEV_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable development mode (raw 500 messages in responses).
pub fn set_dev_mode(on: bool) {
    DEV_MODE.store(on, Ordering::Relaxed);
}

fn dev_mode() -> bool {
    DEV_MODE.load(Ordering::Relaxed)
}

/// Unified service error type used across all modules.
///
/// Each variant maps to an HTTP status code, and every error renders as
/// the uniform response envelope:
///
/// ```json
/// {"success": false, "message": "Post not found"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request input failed schema validation. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// A resource id does not match the 24-character key format. HTTP 400.
    #[error("{0}")]
    InvalidId(String),

    /// The caller's id is already in the post's like-set. HTTP 400.
    #[error("You have already liked the post")]
    AlreadyLiked,

    /// Unique-field violation, named after the offending field. HTTP 400.
    #[error("{0} already exists")]
    Duplicate(String),

    /// Missing, malformed, or unverifiable credentials. HTTP 401.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not the owner of the resource. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Build a `Duplicate` error from a field name, capitalized for the
    /// client-facing message ("Email already exists").
    pub fn duplicate(field: &str) -> Self {
        let mut chars = field.chars();
        let named = match chars.next() {
            Some(first) => first.to_uppercase().to_string() + chars.as_str(),
            None => "Field".to_string(),
        };
        ServiceError::Duplicate(named)
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::InvalidId(_)
            | ServiceError::AlreadyLiked
            | ServiceError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message exposed to clients. 500-class messages are masked
    /// unless development mode is enabled; the raw message is only for
    /// the log.
    pub fn public_message(&self, dev: bool) -> String {
        match self {
            ServiceError::Storage(_) | ServiceError::Internal(_) if !dev => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Translate a storage-level error message into a `Duplicate` error
    /// naming the violated field, or a generic `Storage` error.
    ///
    /// SQLite reports unique violations as
    /// `UNIQUE constraint failed: users.email`.
    pub fn from_store(msg: String) -> Self {
        if let Some(rest) = msg.split("UNIQUE constraint failed:").nth(1) {
            let field = rest
                .trim()
                .split(',')
                .next()
                .and_then(|col| col.rsplit('.').next())
                .unwrap_or("field")
                .trim();
            return ServiceError::duplicate(field);
        }
        ServiceError::Storage(msg)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.public_message(dev_mode()),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::InvalidId("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::AlreadyLiked.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::Duplicate("email".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::Unauthenticated("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Storage("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_message_capitalizes_the_field() {
        let err = ServiceError::duplicate("email");
        assert_eq!(err.to_string(), "Email already exists");
    }

    #[test]
    fn unique_violation_translates_to_duplicate() {
        let err = ServiceError::from_store(
            "execution error: UNIQUE constraint failed: users.email".into(),
        );
        match err {
            ServiceError::Duplicate(field) => assert_eq!(field, "Email"),
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn other_store_errors_stay_storage() {
        let err = ServiceError::from_store("disk I/O error".into());
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn internal_messages_are_masked_in_production() {
        let err = ServiceError::Internal("table posts is missing".into());
        assert_eq!(err.public_message(false), "Internal Server Error");
        assert_eq!(err.public_message(true), "table posts is missing");
    }

    #[test]
    fn client_errors_are_never_masked() {
        let err = ServiceError::NotFound("Post not found".into());
        assert_eq!(err.public_message(false), "Post not found");
    }
}
