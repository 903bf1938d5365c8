//! The uniform response envelope: `{success, message, data?}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ServiceError;

fn envelope<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: Option<T>,
) -> Response {
    let mut body = serde_json::json!({
        "success": true,
        "message": message,
    });
    if let Some(data) = data {
        match serde_json::to_value(data) {
            Ok(value) => {
                body["data"] = value;
            }
            Err(e) => {
                return ServiceError::Internal(e.to_string()).into_response();
            }
        }
    }
    (status, axum::Json(body)).into_response()
}

/// 200 envelope with a data payload.
pub fn ok<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::OK, message, Some(data))
}

/// 201 envelope with a data payload.
pub fn created<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::CREATED, message, Some(data))
}

/// 200 envelope with no data (delete confirmations).
pub fn message_only(message: &str) -> Response {
    envelope::<()>(StatusCode::OK, message, None)
}

/// Parse a raw request body into a typed shape.
///
/// Handlers take raw bytes instead of a framework extractor so that a
/// malformed body still produces the envelope, not a framework default.
pub fn from_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ServiceError::Validation(format!("Invalid request body: {}", e)))
}
