use super::common::{success_response, PaginatedResponse, PaginationParams};
use crate::{auth::AuthUser, entities::stock_alert::AlertType, errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
    pub alert_type: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

fn default_active_only() -> bool {
    true
}

/// List stock alerts
async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alert_type = match query.alert_type {
        Some(raw) => {
            Some(AlertType::from_str(&raw).map_err(|e: String| ApiError::BadRequest(e))?)
        }
        None => None,
    };

    let (alerts, total) = state
        .services
        .alerts
        .list_alerts(
            query.active_only,
            alert_type,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        alerts,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Sweep every item for due alerts
async fn check_alerts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let raised = state.services.alerts.evaluate_all().await?;
    Ok(success_response(json!({ "alerts_raised": raised })))
}

/// Acknowledge and close an alert
async fn acknowledge_alert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.services.alerts.acknowledge(id, user.user_id).await?;
    Ok(success_response(alert))
}

/// Alert routes, staff only
pub fn alert_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/check", post(check_alerts))
        .route("/:id/acknowledge", put(acknowledge_alert))
}
