mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use kaiwhakarite_api::{app, auth::RegisterRequest, AppState};
use std::sync::Arc;
use tower::ServiceExt;

async fn build_app(ctx: &common::TestContext) -> axum::Router {
    let state = Arc::new(AppState {
        db: ctx.db.clone(),
        config: Arc::new(common::test_config()),
        services: ctx.services.clone(),
    });
    app(state)
}

async fn token_for(ctx: &common::TestContext, email: &str, role: &str) -> String {
    ctx.services
        .auth
        .register(RegisterRequest {
            email: email.to_string(),
            password: "kia-kaha-2026".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Some(role.to_string()),
            whanau_group: None,
            marae: None,
            language_preference: None,
        })
        .await
        .unwrap();
    ctx.services
        .auth
        .login(email, "kia-kaha-2026")
        .await
        .unwrap()
        .access_token
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_and_status_are_public() {
    let ctx = common::setup().await;
    let app = build_app(&ctx).await;

    let health = app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let status = app.oneshot(get("/status", None)).await.unwrap();
    assert_eq!(status.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_routes_require_a_token() {
    let ctx = common::setup().await;
    let app = build_app(&ctx).await;

    let items = app.clone().oneshot(get("/api/v1/items", None)).await.unwrap();
    assert_eq!(items.status(), StatusCode::UNAUTHORIZED);

    let bookings = app.oneshot(get("/api/v1/bookings", None)).await.unwrap();
    assert_eq!(bookings.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn members_browse_but_cannot_reach_staff_routers() {
    let ctx = common::setup().await;
    let app = build_app(&ctx).await;
    let token = token_for(&ctx, "whanau@example.org", "Whānau").await;

    let items = app
        .clone()
        .oneshot(get("/api/v1/items", Some(&token)))
        .await
        .unwrap();
    assert_eq!(items.status(), StatusCode::OK);

    let categories = app
        .clone()
        .oneshot(get("/api/v1/categories", Some(&token)))
        .await
        .unwrap();
    assert_eq!(categories.status(), StatusCode::OK);

    for staff_only in [
        "/api/v1/movements",
        "/api/v1/alerts",
        "/api/v1/valuation/inventory",
        "/api/v1/transfers",
        "/api/v1/purchase-orders",
        "/api/v1/suppliers",
        "/api/v1/reports/dashboard",
    ] {
        let denied = app
            .clone()
            .oneshot(get(staff_only, Some(&token)))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN, "{}", staff_only);
    }
}

#[tokio::test]
async fn staff_reach_the_gated_routers() {
    let ctx = common::setup().await;
    let app = build_app(&ctx).await;
    let token = token_for(&ctx, "kaimahi@example.org", "Kaimahi").await;

    for route in [
        "/api/v1/items",
        "/api/v1/movements",
        "/api/v1/alerts",
        "/api/v1/suppliers",
        "/api/v1/reports/dashboard",
    ] {
        let response = app.clone().oneshot(get(route, Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", route);
    }
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let ctx = common::setup().await;
    let app = build_app(&ctx).await;

    let response = app
        .oneshot(get("/api/v1/items", Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
