use super::common::{created_response, require_staff, success_response, validate_input};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    services::lookups::{CreateCategoryInput, CreateLocationInput},
    AppState,
};
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "English name is required"))]
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "English name is required"))]
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub is_main_warehouse: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListLookupsQuery {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// List categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLookupsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .lookups
        .list_categories(query.active_only)
        .await?;
    Ok(success_response(categories))
}

/// Create a category
async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    validate_input(&payload)?;

    let category = state
        .services
        .lookups
        .create_category(CreateCategoryInput {
            name_en: payload.name_en,
            name_mi: payload.name_mi,
            description_en: payload.description_en,
            description_mi: payload.description_mi,
        })
        .await?;

    Ok(created_response(category))
}

/// List storage locations
async fn list_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLookupsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locations = state
        .services
        .lookups
        .list_locations(query.active_only)
        .await?;
    Ok(success_response(locations))
}

/// Create a storage location
async fn create_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    validate_input(&payload)?;

    let location = state
        .services
        .lookups
        .create_location(CreateLocationInput {
            name_en: payload.name_en,
            name_mi: payload.name_mi,
            description_en: payload.description_en,
            description_mi: payload.description_mi,
            address: payload.address,
            contact_person: payload.contact_person,
            contact_phone: payload.contact_phone,
            is_main_warehouse: payload.is_main_warehouse,
        })
        .await?;

    Ok(created_response(location))
}

/// Category routes. Reads for every member, writes for staff.
pub fn category_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_categories).post(create_category))
}

/// Location routes. Reads for every member, writes for staff.
pub fn location_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_locations).post(create_location))
}
