use super::common::success_response;
use crate::{entities::inventory_valuation::ValuationMethod, errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ValuationQuery {
    #[serde(default = "default_method")]
    pub method: String,
    pub as_of: Option<NaiveDate>,
}

fn default_method() -> String {
    "AVERAGE".to_string()
}

/// Value one item with the requested method
async fn value_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<ValuationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let method =
        ValuationMethod::from_str(&query.method).map_err(|e: String| ApiError::BadRequest(e))?;

    let result = state
        .services
        .valuation
        .value_item(id, method, query.as_of)
        .await?;

    match result {
        Some(result) => Ok(success_response(result)),
        None => Err(ApiError::NotFound(
            "No valuation available for this item".to_string(),
        )),
    }
}

/// Valuation snapshot history for one item
async fn valuation_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state.services.valuation.valuation_history(id).await?;
    Ok(success_response(history))
}

/// Value the whole inventory
async fn value_inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ValuationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let method =
        ValuationMethod::from_str(&query.method).map_err(|e: String| ApiError::BadRequest(e))?;

    let report = state
        .services
        .valuation
        .value_inventory(method, query.as_of)
        .await?;

    Ok(success_response(report))
}

/// Valuation routes, staff only
pub fn valuation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory", get(value_inventory))
        .route("/items/:id", get(value_item))
        .route("/items/:id/history", get(valuation_history))
}
