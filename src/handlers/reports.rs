use super::common::success_response;
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RecentMovementsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    20
}

/// Whole-inventory summary with category breakdown
async fn inventory_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.services.reports.inventory_summary().await?;
    Ok(success_response(summary))
}

/// Headline counts for the dashboard
async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.services.reports.dashboard_stats().await?;
    Ok(success_response(stats))
}

/// Latest ledger activity
async fn recent_movements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentMovementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = state.services.reports.recent_movements(query.limit).await?;
    Ok(success_response(movements))
}

/// Report routes, staff only
pub fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory-summary", get(inventory_summary))
        .route("/dashboard", get(dashboard_stats))
        .route("/recent-movements", get(recent_movements))
}
