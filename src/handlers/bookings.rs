use super::common::{
    created_response, require_staff, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    services::bookings::{CreateBookingInput, ReturnBookingInput},
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
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub item_id: i32,
    #[validate(length(min = 1, message = "Kaupapa name is required"))]
    pub kaupapa_name: String,
    pub kaupapa_description: Option<String>,
    pub whanau_group: Option<String>,
    pub quantity_requested: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeclineBookingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReturnBookingRequest {
    pub return_condition: Option<String>,
    pub damage_assessment: Option<String>,
    pub damage_fee: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Request a booking
async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let booking = state
        .services
        .bookings
        .create_booking(
            user.user_id,
            CreateBookingInput {
                item_id: payload.item_id,
                kaupapa_name: payload.kaupapa_name,
                kaupapa_description: payload.kaupapa_description,
                whanau_group: payload.whanau_group,
                quantity_requested: payload.quantity_requested,
                start_date: payload.start_date,
                end_date: payload.end_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(created_response(booking))
}

/// List bookings. Staff see every booking; members only their own.
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (bookings, total) = state
        .services
        .bookings
        .list_bookings(
            user.user_id,
            user.is_staff(),
            query.status,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        bookings,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Get one booking
async fn get_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .services
        .bookings
        .get_booking(id, user.user_id, user.is_staff())
        .await?;
    Ok(success_response(booking))
}

/// Approve a pending booking
async fn approve_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let booking = state.services.bookings.approve(id, user.user_id).await?;
    Ok(success_response(booking))
}

/// Decline a pending booking
async fn decline_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<DeclineBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let booking = state
        .services
        .bookings
        .decline(id, user.user_id, payload.reason)
        .await?;
    Ok(success_response(booking))
}

/// Cancel a booking. Members can cancel their own.
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .services
        .bookings
        .cancel(id, user.user_id, user.is_staff())
        .await?;
    Ok(success_response(booking))
}

/// Hand the items over
async fn checkout_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let booking = state.services.bookings.checkout(id, user.user_id).await?;
    Ok(success_response(booking))
}

/// Take the items back and assess fees
async fn return_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ReturnBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let booking = state
        .services
        .bookings
        .return_booking(
            id,
            user.user_id,
            ReturnBookingInput {
                return_condition: payload.return_condition,
                damage_assessment: payload.damage_assessment,
                damage_fee: payload.damage_fee,
            },
        )
        .await?;
    Ok(success_response(booking))
}

/// Flag checked-out bookings past their end date
async fn mark_overdue(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&user)?;
    let flagged = state.services.bookings.mark_overdue().await?;
    Ok(success_response(json!({ "bookings_flagged": flagged })))
}

/// Booking routes. Role-aware inside each handler.
pub fn booking_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/mark-overdue", post(mark_overdue))
        .route("/:id", get(get_booking))
        .route("/:id/approve", put(approve_booking))
        .route("/:id/decline", put(decline_booking))
        .route("/:id/cancel", put(cancel_booking))
        .route("/:id/checkout", put(checkout_booking))
        .route("/:id/return", put(return_booking))
}
