use super::common::{
    created_response, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthUser,
    entities::purchase_order::PurchaseOrderStatus,
    errors::ApiError,
    services::purchase_orders::{
        CreatePurchaseOrderInput, PurchaseOrderLineInput, ReceiptLineInput, ReceiveGoodsInput,
        UpdatePurchaseOrderInput,
    },
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

// The length validation on the line vectors serializes offending values
// into the error params, so the line structs derive Serialize too.
#[derive(Debug, Deserialize, Serialize)]
pub struct PurchaseOrderLineRequest {
    pub item_id: Option<i32>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: i32,
    pub expected_delivery_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<PurchaseOrderLineRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePurchaseOrderRequest {
    pub expected_delivery_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReceiptLineRequest {
    pub purchase_order_item_id: i32,
    pub quantity_received: i32,
    pub condition_status: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveGoodsRequest {
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "At least one receipt line is required"))]
    pub lines: Vec<ReceiptLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub supplier_id: Option<i32>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Create a draft purchase order
async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .lines
        .into_iter()
        .map(|line| PurchaseOrderLineInput {
            item_id: line.item_id,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
            tax_rate: line.tax_rate,
        })
        .collect();

    let detail = state
        .services
        .purchase_orders
        .create_order(
            CreatePurchaseOrderInput {
                supplier_id: payload.supplier_id,
                expected_delivery_date: payload.expected_delivery_date,
                currency: payload.currency,
                payment_terms: payload.payment_terms,
                delivery_address: payload.delivery_address,
                notes: payload.notes,
                lines,
            },
            user.user_id,
        )
        .await?;

    Ok(created_response(detail))
}

/// List purchase orders
async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .purchase_orders
        .list_orders(
            query.status,
            query.supplier_id,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Get one purchase order with its lines
async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.services.purchase_orders.get_order(id).await?;
    Ok(success_response(detail))
}

/// Update header fields on an open order
async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .update_order(
            id,
            UpdatePurchaseOrderInput {
                expected_delivery_date: payload.expected_delivery_date,
                payment_terms: payload.payment_terms,
                delivery_address: payload.delivery_address,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(success_response(order))
}

/// Move an order along its lifecycle
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = PurchaseOrderStatus::from_str(&payload.status)
        .map_err(|e: String| ApiError::BadRequest(e))?;

    let order = state
        .services
        .purchase_orders
        .update_status(id, status, user.user_id)
        .await?;

    Ok(success_response(order))
}

/// Receive goods against a confirmed order
async fn receive_goods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ReceiveGoodsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .lines
        .into_iter()
        .map(|line| ReceiptLineInput {
            purchase_order_item_id: line.purchase_order_item_id,
            quantity_received: line.quantity_received,
            condition_status: line.condition_status,
            expiry_date: line.expiry_date,
            batch_number: line.batch_number,
            notes: line.notes,
        })
        .collect();

    let receipt = state
        .services
        .purchase_orders
        .receive_goods(
            id,
            ReceiveGoodsInput {
                notes: payload.notes,
                lines,
            },
            user.user_id,
        )
        .await?;

    Ok(created_response(receipt))
}

/// List goods received notes for an order
async fn list_receipts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let receipts = state.services.purchase_orders.list_receipts(id).await?;
    Ok(success_response(receipts))
}

/// Purchase order routes, staff only
pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order).put(update_order))
        .route("/:id/status", put(update_status))
        .route("/:id/receive", post(receive_goods))
        .route("/:id/receipts", get(list_receipts))
}
