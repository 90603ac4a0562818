#![allow(dead_code)]

use kaiwhakarite_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::user::{self, UserRole, UserStatus},
    events::EventSender,
    services::inventory::CreateItemInput,
    services::lookups::CreateLocationInput,
    services::suppliers::CreateSupplierInput,
    Services,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use std::time::Duration;

pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub services: Services,
}

/// Fresh in-memory database with migrations applied. The pool is pinned
/// to one connection so every query sees the same SQLite database.
pub async fn setup() -> TestContext {
    let db_config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout: Duration::from_secs(5),
        idle_timeout: Duration::from_secs(60),
    };
    let pool = Arc::new(
        db::establish_connection_with_config(&db_config)
            .await
            .expect("database connection"),
    );
    db::run_migrations(&pool).await.expect("migrations");

    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });

    let services = Services::build(pool.clone(), EventSender::new(tx), &test_config());

    TestContext { db: pool, services }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "kcu4W9vN2pQx8ZrT6bMfHs3JgLdY7aEw5nC1iVoUq".to_string(),
        jwt_expiration: 3600,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        log_json: false,
        auto_migrate: false,
        cors_allowed_origins: None,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        db_idle_timeout_secs: 60,
        late_fee_per_day: 5.0,
        expiry_warning_days: 30,
        default_tax_rate: 0.15,
        default_currency: "NZD".to_string(),
        event_channel_capacity: 64,
    }
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, role: UserRole) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        role: Set(role.to_string()),
        status: Set(UserStatus::Active.to_string()),
        whanau_group: Set(None),
        marae: Set(None),
        language_preference: Set("en".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_location(ctx: &TestContext, name: &str) -> i32 {
    ctx.services
        .lookups
        .create_location(CreateLocationInput {
            name_en: name.to_string(),
            name_mi: None,
            description_en: None,
            description_mi: None,
            address: None,
            contact_person: None,
            contact_phone: None,
            is_main_warehouse: None,
        })
        .await
        .expect("seed location")
        .id
}

pub async fn seed_supplier(ctx: &TestContext, name: &str) -> i32 {
    ctx.services
        .suppliers
        .create_supplier(CreateSupplierInput {
            name: name.to_string(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            website: None,
            tax_number: None,
            payment_terms: None,
            currency: None,
            notes: None,
        })
        .await
        .expect("seed supplier")
        .id
}

/// Minimal item input; tests override the fields they care about.
pub fn item_input(name: &str, quantity: i32) -> CreateItemInput {
    CreateItemInput {
        name_en: name.to_string(),
        name_mi: None,
        description_en: None,
        description_mi: None,
        category_id: None,
        barcode: None,
        sku: None,
        serial_number: None,
        quantity,
        unit: None,
        location_id: None,
        condition_status: None,
        purchase_date: None,
        purchase_cost: None,
        supplier_id: None,
        warranty_expiry: None,
        expiry_date: None,
        reorder_level: None,
        max_stock_level: None,
        is_loanable: None,
        loan_duration_days: None,
        tags: None,
        notes: None,
        weight: None,
        dimensions: None,
    }
}
