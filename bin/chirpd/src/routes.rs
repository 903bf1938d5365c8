//! Route registration — module routes plus system endpoints.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use chirp_core::now_rfc3339;

/// Build the complete router.
///
/// Module routes arrive already rooted (each module mounted its own
/// prefix and bound its own state), so they merge directly.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        tracing::info!(module = name, "routes mounted");
        app = app.merge(router);
    }

    app.fallback(not_found)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "OK",
        "timestamp": now_rfc3339(),
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "chirpd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
