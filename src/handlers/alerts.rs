use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::AlertsResponse;
use crate::service::AlertRequest;
use axum::extract::{Query, State};
use axum::Json;

/// GET /alerts - Check whether ERROR volume exceeds the threshold
///
/// Example: GET /alerts?minutes=5&error_threshold=5
///
/// Returns `{"alerts": []}` when nothing triggered.
pub async fn get_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertRequest>,
) -> Result<Json<AlertsResponse>, AppError> {
    let result = state.services.alerts.evaluate_request(&params).await?;
    Ok(Json(AlertsResponse::from(&result)))
}
