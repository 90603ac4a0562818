use crate::{
    entities::{
        purchase_order::{self, Entity as PurchaseOrder, PurchaseOrderStatus},
        supplier::{self, Entity as Supplier},
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub tax_number: Option<String>,
    pub payment_terms: Option<String>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub tax_number: Option<String>,
    pub payment_terms: Option<String>,
    pub currency: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

/// Delivery track record derived from a supplier's purchase orders.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierPerformance {
    pub supplier_id: i32,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub total_spend: Decimal,
    pub on_time_deliveries: u64,
    pub on_time_rate: Option<f64>,
    pub average_delivery_days: Option<f64>,
}

#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let now = Utc::now();
        let created = supplier::ActiveModel {
            name: Set(input.name),
            contact_person: Set(input.contact_person),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            website: Set(input.website),
            tax_number: Set(input.tax_number),
            payment_terms: Set(input.payment_terms.unwrap_or_else(|| "Net 30".to_string())),
            currency: Set(input.currency.unwrap_or_else(|| "NZD".to_string())),
            rating: Set(None),
            is_active: Set(true),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, supplier_id: i32) -> Result<supplier::Model, ServiceError> {
        Supplier::find_by_id(supplier_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supplier not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        search: Option<String>,
        active_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let mut query = Supplier::find();

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(supplier::Column::Name.like(pattern.clone()))
                    .add(supplier::Column::ContactPerson.like(pattern)),
            );
        }
        if active_only {
            query = query.filter(supplier::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(supplier::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let suppliers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((suppliers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        supplier_id: i32,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        if let Some(rating) = input.rating {
            if !(1..=5).contains(&rating) {
                return Err(ServiceError::ValidationError(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
        }

        let record = self.get_supplier(supplier_id).await?;

        let mut active: supplier::ActiveModel = record.into();
        if let Some(v) = input.name {
            active.name = Set(v);
        }
        if let Some(v) = input.contact_person {
            active.contact_person = Set(Some(v));
        }
        if let Some(v) = input.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = input.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = input.address {
            active.address = Set(Some(v));
        }
        if let Some(v) = input.website {
            active.website = Set(Some(v));
        }
        if let Some(v) = input.tax_number {
            active.tax_number = Set(Some(v));
        }
        if let Some(v) = input.payment_terms {
            active.payment_terms = Set(v);
        }
        if let Some(v) = input.currency {
            active.currency = Set(v);
        }
        if let Some(v) = input.rating {
            active.rating = Set(Some(v));
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_supplier(&self, supplier_id: i32) -> Result<(), ServiceError> {
        let record = self.get_supplier(supplier_id).await?;

        let mut active: supplier::ActiveModel = record.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db_pool).await?;

        Ok(())
    }

    /// Aggregates order history into a delivery scorecard. On-time means
    /// the actual delivery landed on or before the expected date.
    #[instrument(skip(self))]
    pub async fn performance(
        &self,
        supplier_id: i32,
    ) -> Result<SupplierPerformance, ServiceError> {
        self.get_supplier(supplier_id).await?;

        let orders = PurchaseOrder::find()
            .filter(purchase_order::Column::SupplierId.eq(supplier_id))
            .all(&*self.db_pool)
            .await?;

        let total_orders = orders.len() as u64;
        let mut completed_orders = 0u64;
        let mut total_spend = Decimal::ZERO;
        let mut on_time_deliveries = 0u64;
        let mut measurable_deliveries = 0u64;
        let mut delivery_days_total = 0i64;
        let mut delivery_days_count = 0u64;

        for order in &orders {
            if order.status != PurchaseOrderStatus::Cancelled.to_string() {
                total_spend += order.total_amount;
            }
            if order.status == PurchaseOrderStatus::Received.to_string() {
                completed_orders += 1;
            }
            if let Some(actual) = order.actual_delivery_date {
                delivery_days_total += (actual - order.order_date).num_days();
                delivery_days_count += 1;
                if let Some(expected) = order.expected_delivery_date {
                    measurable_deliveries += 1;
                    if actual <= expected {
                        on_time_deliveries += 1;
                    }
                }
            }
        }

        let on_time_rate = if measurable_deliveries > 0 {
            Some(on_time_deliveries as f64 / measurable_deliveries as f64)
        } else {
            None
        };
        let average_delivery_days = if delivery_days_count > 0 {
            Some(delivery_days_total as f64 / delivery_days_count as f64)
        } else {
            None
        };

        Ok(SupplierPerformance {
            supplier_id,
            total_orders,
            completed_orders,
            total_spend,
            on_time_deliveries,
            on_time_rate,
            average_delivery_days,
        })
    }
}
