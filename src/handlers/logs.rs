use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CreateLogRequest, LogRecord};
use crate::service::ListRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

/// POST /logs - Store a new log record
///
/// Malformed or incomplete bodies are reported as validation errors.
pub async fn create_log(
    State(state): State<AppState>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LogRecord>), AppError> {
    let Json(body) = payload?;
    let record = state
        .services
        .logs
        .append(&body.level, &body.message, &body.source)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /logs - Most recent logs, optionally filtered
///
/// Example: GET /logs?level=ERROR&source=api-server&limit=10
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<ListRequest>,
) -> Result<Json<Vec<LogRecord>>, AppError> {
    let logs = state.services.query.list(&params).await?;
    Ok(Json(logs))
}
