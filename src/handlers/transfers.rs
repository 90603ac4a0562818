use super::common::{
    created_response, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthUser, errors::ApiError, services::transfers::CreateTransferInput, AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    pub item_id: i32,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub quantity: i32,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Request a transfer between locations
async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let transfer = state
        .services
        .transfers
        .request_transfer(
            CreateTransferInput {
                item_id: payload.item_id,
                from_location_id: payload.from_location_id,
                to_location_id: payload.to_location_id,
                quantity: payload.quantity,
                reason: payload.reason,
                notes: payload.notes,
            },
            user.user_id,
        )
        .await?;

    Ok(created_response(transfer))
}

/// List transfers
async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTransfersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (transfers, total) = state
        .services
        .transfers
        .list_transfers(
            query.status,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        transfers,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Get one transfer
async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = state.services.transfers.get_transfer(id).await?;
    Ok(success_response(transfer))
}

/// Approve a pending transfer
async fn approve_transfer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = state.services.transfers.approve(id, user.user_id).await?;
    Ok(success_response(transfer))
}

/// Complete an approved transfer and relocate the stock
async fn complete_transfer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = state.services.transfers.complete(id, user.user_id).await?;
    Ok(success_response(transfer))
}

/// Cancel a transfer
async fn cancel_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = state.services.transfers.cancel(id).await?;
    Ok(success_response(transfer))
}

/// Transfer routes, staff only
pub fn transfer_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_transfer).get(list_transfers))
        .route("/:id", get(get_transfer))
        .route("/:id/approve", put(approve_transfer))
        .route("/:id/complete", put(complete_transfer))
        .route("/:id/cancel", put(cancel_transfer))
}
