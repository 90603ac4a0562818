use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    services::suppliers::{CreateSupplierInput, UpdateSupplierInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub tax_number: Option<String>,
    pub payment_terms: Option<String>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub tax_number: Option<String>,
    pub payment_terms: Option<String>,
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListSuppliersQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Create a supplier
async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create_supplier(CreateSupplierInput {
            name: payload.name,
            contact_person: payload.contact_person,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            website: payload.website,
            tax_number: payload.tax_number,
            payment_terms: payload.payment_terms,
            currency: payload.currency,
            notes: payload.notes,
        })
        .await?;

    Ok(created_response(supplier))
}

/// List suppliers
async fn list_suppliers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSuppliersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(
            query.search,
            query.active_only,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        suppliers,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Get one supplier
async fn get_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state.services.suppliers.get_supplier(id).await?;
    Ok(success_response(supplier))
}

/// Update a supplier
async fn update_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(
            id,
            UpdateSupplierInput {
                name: payload.name,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                website: payload.website,
                tax_number: payload.tax_number,
                payment_terms: payload.payment_terms,
                currency: payload.currency,
                rating: payload.rating,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(success_response(supplier))
}

/// Deactivate a supplier
async fn deactivate_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.suppliers.deactivate_supplier(id).await?;
    Ok(no_content_response())
}

/// Delivery performance for a supplier
async fn supplier_performance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let performance = state.services.suppliers.performance(id).await?;
    Ok(success_response(performance))
}

/// Supplier routes, staff only
pub fn supplier_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route(
            "/:id",
            get(get_supplier)
                .put(update_supplier)
                .delete(deactivate_supplier),
        )
        .route("/:id/performance", get(supplier_performance))
}
