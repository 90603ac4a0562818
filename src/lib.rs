/*!
 * Kaiwhakarite Rawa: bilingual community inventory and resource
 * management backend.
 *
 * Items live in a searchable catalogue; every change to stock flows
 * through an append-only movement ledger; bookings lend items out to
 * whānau and bring them back; purchase orders restock through goods
 * received notes; the valuation engine prices what is on the shelves.
 */

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod services;

use crate::auth::{AuthConfig, AuthRouterExt, AuthService};
use crate::config::AppConfig;
use crate::events::EventSender;
use crate::services::{
    AlertService, BookingService, InventoryService, LookupService, PurchaseOrderService,
    ReportsService, SupplierService, TransferService, ValuationService,
};
use axum::{
    extract::State,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::warn;

/// Uniform success envelope for the handful of endpoints that return
/// status payloads rather than domain models.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Every domain service, wired onto the shared pool and event channel.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub inventory: InventoryService,
    pub valuation: ValuationService,
    pub alerts: AlertService,
    pub bookings: BookingService,
    pub transfers: TransferService,
    pub purchase_orders: PurchaseOrderService,
    pub suppliers: SupplierService,
    pub reports: ReportsService,
    pub lookups: LookupService,
}

impl Services {
    pub fn build(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        config: &AppConfig,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig::new(
                config.jwt_secret.clone(),
                Duration::from_secs(config.jwt_expiration as u64),
            ),
            db.clone(),
        ));

        let late_fee_per_day = Decimal::from_f64(config.late_fee_per_day).unwrap_or_else(|| {
            warn!("late_fee_per_day is not representable; falling back to 5.00");
            Decimal::new(5, 0)
        });
        let default_tax_rate = Decimal::from_f64(config.default_tax_rate).unwrap_or_else(|| {
            warn!("default_tax_rate is not representable; falling back to 0.15");
            Decimal::new(15, 2)
        });

        let alerts = AlertService::new(
            db.clone(),
            event_sender.clone(),
            config.expiry_warning_days,
        );
        let inventory = InventoryService::new(db.clone(), event_sender.clone(), alerts.clone());
        let valuation = ValuationService::new(db.clone(), event_sender.clone());
        let bookings = BookingService::new(
            db.clone(),
            event_sender.clone(),
            alerts.clone(),
            late_fee_per_day,
        );
        let transfers = TransferService::new(db.clone(), event_sender.clone());
        let purchase_orders = PurchaseOrderService::new(
            db.clone(),
            event_sender.clone(),
            alerts.clone(),
            default_tax_rate,
        );
        let suppliers = SupplierService::new(db.clone());
        let reports = ReportsService::new(db.clone());
        let lookups = LookupService::new(db.clone());

        Self {
            auth,
            inventory,
            valuation,
            alerts,
            bookings,
            transfers,
            purchase_orders,
            suppliers,
            reports,
            lookups,
        }
    }
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: Services,
}

/// The versioned API surface. Whole routers are gated by role: member
/// routers still require a valid token; staff routers additionally
/// require a kaimahi, manager or admin role.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/items", handlers::item_routes().with_auth())
        .nest("/movements", handlers::movement_routes().with_staff())
        .nest("/valuation", handlers::valuation_routes().with_staff())
        .nest("/alerts", handlers::alert_routes().with_staff())
        .nest("/bookings", handlers::booking_routes().with_auth())
        .nest("/transfers", handlers::transfer_routes().with_staff())
        .nest(
            "/purchase-orders",
            handlers::purchase_order_routes().with_staff(),
        )
        .nest("/suppliers", handlers::supplier_routes().with_staff())
        .nest("/categories", handlers::category_routes().with_auth())
        .nest("/locations", handlers::location_routes().with_auth())
        .nest("/reports", handlers::report_routes().with_staff())
}

/// Builds the complete application router.
pub fn app(state: Arc<AppState>) -> Router {
    let auth_service = state.services.auth.clone();

    let cors = build_cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status_check))
        .nest(
            "/api/v1/auth",
            auth::auth_routes().with_state(auth_service.clone()),
        )
        .nest("/api/v1", api_v1_routes())
        .layer(Extension(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    if config.has_cors_allowed_origins() {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ])
    } else {
        CorsLayer::permissive()
    }
}

/// Liveness probe
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe: checks the database connection
async fn status_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match db::check_connection(&state.db).await {
        Ok(()) => "up",
        Err(_) => "down",
    };

    Json(serde_json::json!({
        "status": if database == "up" { "ok" } else { "degraded" },
        "database": database,
        "environment": state.config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_wraps_payload() {
        let response = ApiResponse::new(vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.data, vec![1, 2, 3]);
    }
}
