use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        inventory_valuation::{self, Entity as InventoryValuation, ValuationMethod},
        stock_movement::{self, Entity as StockMovement, MovementType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Outcome of valuing one item.
#[derive(Debug, Clone, Serialize)]
pub struct ValuationResult {
    pub item_id: i32,
    pub method: ValuationMethod,
    pub quantity: i32,
    pub cost_per_unit: Decimal,
    pub total_value: Decimal,
    pub as_of: NaiveDate,
}

/// Whole-inventory valuation report.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryValuationReport {
    pub method: ValuationMethod,
    pub as_of: NaiveDate,
    pub lines: Vec<ValuationResult>,
    pub total_value: Decimal,
}

/// Computes an item's value from its costed IN movements up to `as_of`.
///
/// Returns `Ok(None)` when the item holds no stock or no costed receipts
/// exist, in which case nothing is persisted. FIFO consumes the earliest
/// receipts first, LIFO the latest; AVERAGE and SPECIFIC weight every
/// qualifying receipt, matching the books this system replaced.
pub(crate) async fn compute_valuation<C: ConnectionTrait>(
    conn: &C,
    item: &inventory_item::Model,
    method: ValuationMethod,
    as_of: NaiveDate,
) -> Result<Option<ValuationResult>, ServiceError> {
    if item.quantity <= 0 {
        return Ok(None);
    }

    let end_of_day = as_of
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| ServiceError::InternalError("Invalid valuation date".to_string()))?;
    let cutoff = DateTime::<Utc>::from_naive_utc_and_offset(end_of_day, Utc);

    let receipts = StockMovement::find()
        .filter(stock_movement::Column::ItemId.eq(item.id))
        .filter(stock_movement::Column::MovementType.eq(MovementType::In.to_string()))
        .filter(stock_movement::Column::UnitCost.is_not_null())
        .filter(stock_movement::Column::CreatedAt.lte(cutoff))
        .order_by_asc(stock_movement::Column::CreatedAt)
        .all(conn)
        .await?;

    if receipts.is_empty() {
        return Ok(None);
    }

    let cost_per_unit = match method {
        ValuationMethod::Fifo => layered_cost(receipts.iter(), item.quantity),
        ValuationMethod::Lifo => layered_cost(receipts.iter().rev(), item.quantity),
        ValuationMethod::Average | ValuationMethod::Specific => weighted_average(&receipts),
    };

    let cost_per_unit = match cost_per_unit {
        Some(cost) => cost.round_dp(4),
        None => return Ok(None),
    };

    let total_value = (cost_per_unit * Decimal::from(item.quantity)).round_dp(4);

    Ok(Some(ValuationResult {
        item_id: item.id,
        method,
        quantity: item.quantity,
        cost_per_unit,
        total_value,
        as_of,
    }))
}

/// Walks receipt layers in the given order until the on-hand quantity is
/// covered, then spreads the consumed cost over the full on-hand count.
/// Layers can hold less than on hand when some stock arrived uncosted;
/// those units carry zero cost.
fn layered_cost<'a, I>(receipts: I, on_hand: i32) -> Option<Decimal>
where
    I: Iterator<Item = &'a stock_movement::Model>,
{
    let mut remaining = on_hand;
    let mut covered = 0i32;
    let mut total = Decimal::ZERO;

    for receipt in receipts {
        if remaining <= 0 {
            break;
        }
        let unit_cost = receipt.unit_cost?;
        let take = remaining.min(receipt.quantity);
        total += unit_cost * Decimal::from(take);
        covered += take;
        remaining -= take;
    }

    if covered == 0 {
        return None;
    }

    Some(total / Decimal::from(on_hand))
}

fn weighted_average(receipts: &[stock_movement::Model]) -> Option<Decimal> {
    let mut total_quantity = 0i32;
    let mut total_cost = Decimal::ZERO;

    for receipt in receipts {
        let unit_cost = receipt.unit_cost?;
        total_quantity += receipt.quantity;
        total_cost += unit_cost * Decimal::from(receipt.quantity);
    }

    if total_quantity == 0 {
        return None;
    }

    Some(total_cost / Decimal::from(total_quantity))
}

/// Persists a valuation snapshot and refreshes the item's cached value.
pub(crate) async fn persist_valuation<C: ConnectionTrait>(
    conn: &C,
    result: &ValuationResult,
) -> Result<(), ServiceError> {
    inventory_valuation::ActiveModel {
        item_id: Set(result.item_id),
        valuation_method: Set(result.method.to_string()),
        cost_per_unit: Set(result.cost_per_unit),
        quantity: Set(result.quantity),
        total_value: Set(result.total_value),
        valuation_date: Set(result.as_of),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let item = InventoryItem::find_by_id(result.item_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;
    let mut active: inventory_item::ActiveModel = item.into();
    active.current_value = Set(Some(result.total_value));
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;

    Ok(())
}

/// Values an item as of today and persists the result when one exists.
/// Used after costed receipts to keep the cached value current.
pub(crate) async fn revalue<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    method: ValuationMethod,
) -> Result<Option<ValuationResult>, ServiceError> {
    let item = InventoryItem::find_by_id(item_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

    let result = compute_valuation(conn, &item, method, Utc::now().date_naive()).await?;
    if let Some(result) = &result {
        persist_valuation(conn, result).await?;
    }

    Ok(result)
}

/// Service exposing the valuation engine over items and the whole
/// inventory.
#[derive(Clone)]
pub struct ValuationService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ValuationService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Values one item with the requested method. A `Some` result has
    /// been snapshotted and written back to the item.
    #[instrument(skip(self))]
    pub async fn value_item(
        &self,
        item_id: i32,
        method: ValuationMethod,
        as_of: Option<NaiveDate>,
    ) -> Result<Option<ValuationResult>, ServiceError> {
        let item = InventoryItem::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
        let result = compute_valuation(&*self.db_pool, &item, method, as_of).await?;

        if let Some(result) = &result {
            persist_valuation(&*self.db_pool, result).await?;

            self.event_sender
                .send(Event::ItemRevalued {
                    item_id,
                    method: result.method.to_string(),
                    total_value: result.total_value,
                })
                .await
                .map_err(ServiceError::InternalError)?;

            info!(
                item_id,
                method = %result.method.to_string(),
                total_value = %result.total_value,
                "Valued inventory item"
            );
        }

        Ok(result)
    }

    /// Values every active item and totals the result. Items without a
    /// computable value are skipped rather than counted as zero.
    #[instrument(skip(self))]
    pub async fn value_inventory(
        &self,
        method: ValuationMethod,
        as_of: Option<NaiveDate>,
    ) -> Result<InventoryValuationReport, ServiceError> {
        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

        let items = InventoryItem::find()
            .filter(inventory_item::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;

        let mut lines = Vec::new();
        let mut total_value = Decimal::ZERO;

        for item in items {
            if let Some(result) = compute_valuation(&*self.db_pool, &item, method, as_of).await? {
                persist_valuation(&*self.db_pool, &result).await?;
                total_value += result.total_value;
                lines.push(result);
            }
        }

        Ok(InventoryValuationReport {
            method,
            as_of,
            lines,
            total_value,
        })
    }

    /// Snapshot history for one item, newest first.
    #[instrument(skip(self))]
    pub async fn valuation_history(
        &self,
        item_id: i32,
    ) -> Result<Vec<inventory_valuation::Model>, ServiceError> {
        let history = InventoryValuation::find()
            .filter(inventory_valuation::Column::ItemId.eq(item_id))
            .order_by_desc(inventory_valuation::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;
        Ok(history)
    }
}
