use super::common::{
    created_response, no_content_response, require_staff, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    services::inventory::{
        BulkAdjustmentLine, CreateItemInput, ItemFilter, MovementFilter, MovementInput,
        UpdateItemInput,
    },
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "English name is required"))]
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub category_id: Option<i32>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    pub unit: Option<String>,
    pub location_id: Option<i32>,
    pub condition_status: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub supplier_id: Option<i32>,
    pub warranty_expiry: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub is_loanable: Option<bool>,
    pub loan_duration_days: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    pub name_en: Option<String>,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub category_id: Option<i32>,
    pub barcode: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub location_id: Option<i32>,
    pub condition_status: Option<String>,
    pub supplier_id: Option<i32>,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub is_loanable: Option<bool>,
    pub loan_duration_days: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub low_stock: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordMovementRequest {
    pub item_id: i32,
    #[validate(length(min = 1, message = "Movement type is required"))]
    pub movement_type: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub reference_id: Option<i32>,
    pub reference_type: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    pub item_id: Option<i32>,
    pub movement_type: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkAdjustmentRequest {
    #[validate(length(min = 1, message = "At least one adjustment line is required"))]
    pub lines: Vec<BulkAdjustmentLineRequest>,
}

// Serialize feeds the length validator's error params.
#[derive(Debug, Deserialize, Serialize)]
pub struct BulkAdjustmentLineRequest {
    pub item_id: i32,
    pub quantity_change: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1))]
    pub variant_name: String,
    #[validate(length(min = 1))]
    pub variant_value: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    pub additional_cost: Option<Decimal>,
}

/// Create a new inventory item
async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    validate_input(&payload)?;

    let item = state
        .services
        .inventory
        .create_item(
            CreateItemInput {
                name_en: payload.name_en,
                name_mi: payload.name_mi,
                description_en: payload.description_en,
                description_mi: payload.description_mi,
                category_id: payload.category_id,
                barcode: payload.barcode,
                sku: payload.sku,
                serial_number: payload.serial_number,
                quantity: payload.quantity,
                unit: payload.unit,
                location_id: payload.location_id,
                condition_status: payload.condition_status,
                purchase_date: payload.purchase_date,
                purchase_cost: payload.purchase_cost,
                supplier_id: payload.supplier_id,
                warranty_expiry: payload.warranty_expiry,
                expiry_date: payload.expiry_date,
                reorder_level: payload.reorder_level,
                max_stock_level: payload.max_stock_level,
                is_loanable: payload.is_loanable,
                loan_duration_days: payload.loan_duration_days,
                tags: payload.tags,
                notes: payload.notes,
                weight: payload.weight,
                dimensions: payload.dimensions,
            },
            user.user_id,
        )
        .await?;

    Ok(created_response(item))
}

/// List inventory items with search and filters
async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .inventory
        .list_items(
            ItemFilter {
                search: query.search,
                category_id: query.category_id,
                location_id: query.location_id,
                is_active: query.is_active,
                low_stock_only: query.low_stock,
            },
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        items,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(success_response(item))
}

/// Update an item
async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    validate_input(&payload)?;

    let item = state
        .services
        .inventory
        .update_item(
            id,
            UpdateItemInput {
                name_en: payload.name_en,
                name_mi: payload.name_mi,
                description_en: payload.description_en,
                description_mi: payload.description_mi,
                category_id: payload.category_id,
                barcode: payload.barcode,
                quantity: payload.quantity,
                unit: payload.unit,
                location_id: payload.location_id,
                condition_status: payload.condition_status,
                supplier_id: payload.supplier_id,
                expiry_date: payload.expiry_date,
                reorder_level: payload.reorder_level,
                max_stock_level: payload.max_stock_level,
                is_loanable: payload.is_loanable,
                loan_duration_days: payload.loan_duration_days,
                tags: payload.tags,
                notes: payload.notes,
            },
            user.user_id,
        )
        .await?;

    Ok(success_response(item))
}

/// Soft-delete an item
async fn deactivate_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    state.services.inventory.deactivate_item(id).await?;
    Ok(no_content_response())
}

/// Record a stock movement
async fn record_movement(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let movement_type = FromStr::from_str(&payload.movement_type)
        .map_err(|e: String| ApiError::BadRequest(e))?;

    let movement = state
        .services
        .inventory
        .record_movement(MovementInput {
            item_id: payload.item_id,
            movement_type,
            quantity: payload.quantity,
            unit_cost: payload.unit_cost,
            from_location_id: payload.from_location_id,
            to_location_id: payload.to_location_id,
            reference_id: payload.reference_id,
            reference_type: payload.reference_type,
            user_id: Some(user.user_id),
            reason: payload.reason,
            notes: payload.notes,
        })
        .await?;

    Ok(created_response(movement))
}

/// List stock movements
async fn list_movements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMovementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movement_type = match query.movement_type {
        Some(raw) => Some(FromStr::from_str(&raw).map_err(|e: String| ApiError::BadRequest(e))?),
        None => None,
    };

    let (movements, total) = state
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: query.item_id,
                movement_type,
            },
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        movements,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Ledger history for one item
async fn item_movements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let (movements, total) = state
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(id),
                movement_type: None,
            },
            pagination.page,
            pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        movements,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Apply a batch of stock corrections
async fn bulk_adjust(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BulkAdjustmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .lines
        .into_iter()
        .map(|line| BulkAdjustmentLine {
            item_id: line.item_id,
            quantity_change: line.quantity_change,
            reason: line.reason,
        })
        .collect();

    let movements = state
        .services
        .inventory
        .bulk_adjust(lines, user.user_id)
        .await?;

    Ok(created_response(movements))
}

/// Add a variant to an item
async fn create_variant(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateVariantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    validate_input(&payload)?;

    let variant = state
        .services
        .inventory
        .create_variant(
            id,
            payload.variant_name,
            payload.variant_value,
            payload.sku,
            payload.barcode,
            payload.quantity,
            payload.additional_cost,
        )
        .await?;

    Ok(created_response(variant))
}

/// List an item's variants
async fn list_variants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let variants = state.services.inventory.list_variants(id).await?;
    Ok(success_response(variants))
}

/// Item routes. Reads are open to every member; mutations check for
/// staff in the handler because both share a path.
pub fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(deactivate_item))
        .route("/:id/movements", get(item_movements))
        .route("/:id/variants", get(list_variants).post(create_variant))
}

/// Ledger routes, staff only
pub fn movement_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(record_movement).get(list_movements))
        .route("/bulk-adjust", post(bulk_adjust))
}
