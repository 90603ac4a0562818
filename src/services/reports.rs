use crate::{
    entities::{
        booking::{self, BookingStatus, Entity as Booking},
        category::{self, Entity as Category},
        inventory_item::{self, Entity as InventoryItem},
        purchase_order::{self, Entity as PurchaseOrder, PurchaseOrderStatus},
        stock_alert::{self, Entity as StockAlert},
        stock_movement::{self, Entity as StockMovement},
    },
    errors::ServiceError,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category_id: Option<i32>,
    pub category_name_en: String,
    pub category_name_mi: Option<String>,
    pub item_count: u64,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventorySummary {
    pub total_items: u64,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub low_stock_items: u64,
    pub out_of_stock_items: u64,
    pub by_category: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_items: u64,
    pub pending_bookings: u64,
    pub active_bookings: u64,
    pub overdue_bookings: u64,
    pub open_alerts: u64,
    pub orders_awaiting_receipt: u64,
    pub movements_last_seven_days: u64,
}

/// Read-only aggregations for the dashboard and stocktake views.
#[derive(Clone)]
pub struct ReportsService {
    db_pool: Arc<DatabaseConnection>,
}

impl ReportsService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    /// Whole-inventory snapshot with a per-category breakdown.
    #[instrument(skip(self))]
    pub async fn inventory_summary(&self) -> Result<InventorySummary, ServiceError> {
        let items = InventoryItem::find()
            .filter(inventory_item::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;

        let categories: HashMap<i32, category::Model> = Category::find()
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut total_quantity = 0i64;
        let mut total_value = Decimal::ZERO;
        let mut low_stock_items = 0u64;
        let mut out_of_stock_items = 0u64;
        let mut per_category: HashMap<Option<i32>, (u64, i64)> = HashMap::new();

        for item in &items {
            total_quantity += item.quantity as i64;
            if let Some(value) = item.current_value {
                total_value += value;
            }
            if item.quantity == 0 {
                out_of_stock_items += 1;
            } else if item.reorder_level > 0 && item.quantity <= item.reorder_level {
                low_stock_items += 1;
            }
            let entry = per_category.entry(item.category_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += item.quantity as i64;
        }

        let mut by_category: Vec<CategoryBreakdown> = per_category
            .into_iter()
            .map(|(category_id, (item_count, quantity))| {
                let (name_en, name_mi) = match category_id.and_then(|id| categories.get(&id)) {
                    Some(cat) => (cat.name_en.clone(), cat.name_mi.clone()),
                    None => ("Uncategorised".to_string(), None),
                };
                CategoryBreakdown {
                    category_id,
                    category_name_en: name_en,
                    category_name_mi: name_mi,
                    item_count,
                    total_quantity: quantity,
                }
            })
            .collect();
        by_category.sort_by(|a, b| a.category_name_en.cmp(&b.category_name_en));

        Ok(InventorySummary {
            total_items: items.len() as u64,
            total_quantity,
            total_value,
            low_stock_items,
            out_of_stock_items,
            by_category,
        })
    }

    /// Headline counts for the landing dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;

        let active_items = InventoryItem::find()
            .filter(inventory_item::Column::IsActive.eq(true))
            .count(db)
            .await?;

        let pending_bookings = Booking::find()
            .filter(booking::Column::Status.eq(BookingStatus::Pending.to_string()))
            .count(db)
            .await?;
        let active_bookings = Booking::find()
            .filter(booking::Column::Status.eq(BookingStatus::Active.to_string()))
            .count(db)
            .await?;
        let overdue_bookings = Booking::find()
            .filter(booking::Column::Status.eq(BookingStatus::Overdue.to_string()))
            .count(db)
            .await?;

        let open_alerts = StockAlert::find()
            .filter(stock_alert::Column::IsActive.eq(true))
            .count(db)
            .await?;

        let awaiting = vec![
            PurchaseOrderStatus::Confirmed.to_string(),
            PurchaseOrderStatus::PartiallyReceived.to_string(),
        ];
        let orders_awaiting_receipt = PurchaseOrder::find()
            .filter(purchase_order::Column::Status.is_in(awaiting))
            .count(db)
            .await?;

        let week_ago = Utc::now() - Duration::days(7);
        let movements_last_seven_days = StockMovement::find()
            .filter(stock_movement::Column::CreatedAt.gte(week_ago))
            .count(db)
            .await?;

        Ok(DashboardStats {
            active_items,
            pending_bookings,
            active_bookings,
            overdue_bookings,
            open_alerts,
            orders_awaiting_receipt,
            movements_last_seven_days,
        })
    }

    /// Most recent ledger activity, newest first.
    #[instrument(skip(self))]
    pub async fn recent_movements(
        &self,
        limit: u64,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        let movements = StockMovement::find()
            .order_by_desc(stock_movement::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(movements)
    }
}
