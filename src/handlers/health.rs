use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK while the process is serving; does not touch the store
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Root endpoint
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "message": "LogflareX API is running" })),
    )
}
