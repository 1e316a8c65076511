use crate::handlers::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// Handle the Prometheus scrape endpoint
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, state.metrics.render())
}
