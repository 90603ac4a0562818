use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        stock_alert::{self, AlertType, Entity as StockAlert},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service that raises and acknowledges stock alerts.
///
/// Each rule fires independently and at most one active alert exists per
/// item and type. Alerts stay open until a person acknowledges them, even
/// when the condition that raised them clears.
#[derive(Clone)]
pub struct AlertService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    expiry_warning_days: i64,
}

impl AlertService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        expiry_warning_days: i64,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            expiry_warning_days,
        }
    }

    /// Evaluates every rule for one item and raises the alerts that are
    /// due and not already open.
    #[instrument(skip(self))]
    pub async fn evaluate_item(&self, item_id: i32) -> Result<Vec<stock_alert::Model>, ServiceError> {
        let item = InventoryItem::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        let mut raised = Vec::new();

        for (alert_type, threshold, message) in self.triggered_rules(&item) {
            if self.has_active_alert(item.id, alert_type).await? {
                continue;
            }

            let alert = stock_alert::ActiveModel {
                item_id: Set(item.id),
                alert_type: Set(alert_type.to_string()),
                threshold_value: Set(threshold),
                current_value: Set(Some(item.quantity)),
                message: Set(message),
                is_active: Set(true),
                acknowledged_by: Set(None),
                acknowledged_at: Set(None),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&*self.db_pool)
            .await?;

            self.event_sender
                .send(Event::AlertRaised {
                    alert_id: alert.id,
                    item_id: item.id,
                    alert_type: alert.alert_type.clone(),
                })
                .await
                .map_err(ServiceError::InternalError)?;

            info!(
                alert_id = alert.id,
                item_id = item.id,
                alert_type = %alert.alert_type,
                "Raised stock alert"
            );
            raised.push(alert);
        }

        Ok(raised)
    }

    /// Evaluates every active item. Intended for a periodic sweep so
    /// expiry warnings surface without a stock movement.
    #[instrument(skip(self))]
    pub async fn evaluate_all(&self) -> Result<u64, ServiceError> {
        let items = InventoryItem::find()
            .filter(inventory_item::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;

        let mut raised = 0u64;
        for item in items {
            raised += self.evaluate_item(item.id).await?.len() as u64;
        }

        Ok(raised)
    }

    /// Closes an alert. This is the only path that deactivates one.
    #[instrument(skip(self))]
    pub async fn acknowledge(
        &self,
        alert_id: i32,
        user_id: i32,
    ) -> Result<stock_alert::Model, ServiceError> {
        let alert = StockAlert::find_by_id(alert_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        if !alert.is_active {
            return Err(ServiceError::InvalidOperation(
                "Alert has already been acknowledged".to_string(),
            ));
        }

        let mut active: stock_alert::ActiveModel = alert.into();
        active.is_active = Set(false);
        active.acknowledged_by = Set(Some(user_id));
        active.acknowledged_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::AlertAcknowledged {
                alert_id,
                acknowledged_by: user_id,
            })
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        active_only: bool,
        alert_type: Option<AlertType>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_alert::Model>, u64), ServiceError> {
        let mut query = StockAlert::find();

        if active_only {
            query = query.filter(stock_alert::Column::IsActive.eq(true));
        }
        if let Some(alert_type) = alert_type {
            query = query.filter(stock_alert::Column::AlertType.eq(alert_type.to_string()));
        }

        let paginator = query
            .order_by_desc(stock_alert::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let alerts = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((alerts, total))
    }

    /// Returns the rules an item currently trips. The zero-stock and
    /// low-stock rules are mutually exclusive; the rest stack.
    fn triggered_rules(
        &self,
        item: &inventory_item::Model,
    ) -> Vec<(AlertType, Option<i32>, String)> {
        let mut triggered = Vec::new();

        if item.quantity == 0 {
            triggered.push((
                AlertType::OutOfStock,
                Some(0),
                format!("{} is out of stock", item.name_en),
            ));
        } else if item.reorder_level > 0 && item.quantity <= item.reorder_level {
            triggered.push((
                AlertType::LowStock,
                Some(item.reorder_level),
                format!(
                    "{} is low on stock ({} remaining, reorder at {})",
                    item.name_en, item.quantity, item.reorder_level
                ),
            ));
        }

        if item.max_stock_level > 0 && item.quantity > item.max_stock_level {
            triggered.push((
                AlertType::Overstock,
                Some(item.max_stock_level),
                format!(
                    "{} is overstocked ({} on hand, maximum {})",
                    item.name_en, item.quantity, item.max_stock_level
                ),
            ));
        }

        if let Some(expiry) = item.expiry_date {
            let horizon = Utc::now().date_naive() + Duration::days(self.expiry_warning_days);
            if expiry <= horizon {
                triggered.push((
                    AlertType::ExpiryWarning,
                    None,
                    format!("{} expires on {}", item.name_en, expiry),
                ));
            }
        }

        triggered
    }

    async fn has_active_alert(
        &self,
        item_id: i32,
        alert_type: AlertType,
    ) -> Result<bool, ServiceError> {
        let count = StockAlert::find()
            .filter(stock_alert::Column::ItemId.eq(item_id))
            .filter(stock_alert::Column::AlertType.eq(alert_type.to_string()))
            .filter(stock_alert::Column::IsActive.eq(true))
            .count(&*self.db_pool)
            .await?;
        Ok(count > 0)
    }
}
