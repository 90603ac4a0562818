use crate::{
    entities::{
        booking::{self, BookingStatus},
        category,
        inventory_item::{self, Entity as InventoryItem},
        inventory_valuation::ValuationMethod,
        product_variant,
        stock_movement::{self, Entity as StockMovement, MovementType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{alerts::AlertService, audit, valuation},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Fields accepted when creating an item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub category_id: Option<i32>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub serial_number: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub location_id: Option<i32>,
    pub condition_status: Option<String>,
    pub purchase_date: Option<chrono::NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub supplier_id: Option<i32>,
    pub warranty_expiry: Option<chrono::NaiveDate>,
    pub expiry_date: Option<chrono::NaiveDate>,
    pub reorder_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub is_loanable: Option<bool>,
    pub loan_duration_days: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
}

/// Fields accepted when updating an item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    pub name_en: Option<String>,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub category_id: Option<i32>,
    pub barcode: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub location_id: Option<i32>,
    pub condition_status: Option<String>,
    pub supplier_id: Option<i32>,
    pub expiry_date: Option<chrono::NaiveDate>,
    pub reorder_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub is_loanable: Option<bool>,
    pub loan_duration_days: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// One entry in the append-only stock ledger, before it is written.
#[derive(Debug, Clone)]
pub struct MovementInput {
    pub item_id: i32,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub reference_id: Option<i32>,
    pub reference_type: Option<String>,
    pub user_id: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BulkAdjustmentLine {
    pub item_id: i32,
    pub quantity_change: i32,
    pub reason: Option<String>,
}

/// Filters for listing items.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub is_active: Option<bool>,
    pub low_stock_only: bool,
}

/// Filters for listing ledger entries.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub item_id: Option<i32>,
    pub movement_type: Option<MovementType>,
}

/// Validates a movement against the current item state and applies it:
/// inserts the ledger row and adjusts the cached quantity with a guarded
/// in-database increment so concurrent writers cannot drive it negative.
///
/// Runs on any connection so callers can compose it into a wider
/// transaction. Alert evaluation and revaluation are the caller's job.
pub(crate) async fn apply_movement<C: ConnectionTrait>(
    conn: &C,
    input: &MovementInput,
) -> Result<stock_movement::Model, ServiceError> {
    let item = InventoryItem::find_by_id(input.item_id)
        .filter(inventory_item::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

    match input.movement_type {
        MovementType::Adjustment => {
            if input.quantity == 0 {
                return Err(ServiceError::ValidationError(
                    "Adjustment quantity must not be zero".to_string(),
                ));
            }
        }
        MovementType::Transfer => {
            if input.quantity <= 0 {
                return Err(ServiceError::ValidationError(
                    "Movement quantity must be positive".to_string(),
                ));
            }
            if input.to_location_id.is_none() {
                return Err(ServiceError::ValidationError(
                    "Transfer requires a destination location".to_string(),
                ));
            }
            // Transfers leave the count unchanged, so the guarded UPDATE
            // below never checks them against stock.
            if input.quantity > item.quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Only {} items available",
                    item.quantity
                )));
            }
        }
        _ => {
            if input.quantity <= 0 {
                return Err(ServiceError::ValidationError(
                    "Movement quantity must be positive".to_string(),
                ));
            }
        }
    }

    let delta = input.movement_type.quantity_delta(input.quantity);

    if delta < 0 && item.quantity + delta < 0 {
        return Err(ServiceError::InsufficientStock(format!(
            "Only {} items available",
            item.quantity
        )));
    }

    if delta != 0 {
        // The WHERE clause re-checks the balance so a concurrent writer
        // cannot take the cached quantity negative between our read and
        // this write.
        let result = InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).add(delta),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(input.item_id))
            .filter(Expr::expr(Expr::col(inventory_item::Column::Quantity).add(delta)).gte(0))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "Only {} items available",
                item.quantity
            )));
        }
    }

    if input.movement_type == MovementType::Transfer {
        InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::LocationId,
                Expr::value(input.to_location_id),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(input.item_id))
            .exec(conn)
            .await?;
    }

    let total_cost = input
        .unit_cost
        .map(|cost| cost * Decimal::from(input.quantity.abs()));

    let movement = stock_movement::ActiveModel {
        item_id: Set(input.item_id),
        movement_type: Set(input.movement_type.to_string()),
        quantity: Set(input.quantity),
        unit_cost: Set(input.unit_cost),
        total_cost: Set(total_cost),
        from_location_id: Set(input.from_location_id),
        to_location_id: Set(input.to_location_id),
        reference_id: Set(input.reference_id),
        reference_type: Set(input.reference_type.clone()),
        user_id: Set(input.user_id),
        reason: Set(input.reason.clone()),
        notes: Set(input.notes.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(movement)
}

/// Service for items, the stock ledger and product variants.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: AlertService,
}

impl InventoryService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        alerts: AlertService,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            alerts,
        }
    }

    /// Creates an item. An opening balance is written to the ledger as an
    /// IN movement so the history starts at the true quantity.
    #[instrument(skip(self, input))]
    pub async fn create_item(
        &self,
        input: CreateItemInput,
        user_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        if input.quantity < 0 {
            return Err(ServiceError::ValidationError(
                "Quantity cannot be negative".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let sku = match input.sku.clone() {
            Some(sku) => Some(sku),
            None => Some(self.generate_sku(input.category_id).await?),
        };

        let now = Utc::now();
        let opening_quantity = input.quantity;
        let purchase_cost = input.purchase_cost;

        let tags = match &input.tags {
            Some(tags) => Some(
                serde_json::to_string(tags)
                    .map_err(|e| ServiceError::InternalError(e.to_string()))?,
            ),
            None => None,
        };

        let item = inventory_item::ActiveModel {
            name_en: Set(input.name_en),
            name_mi: Set(input.name_mi),
            description_en: Set(input.description_en),
            description_mi: Set(input.description_mi),
            category_id: Set(input.category_id),
            barcode: Set(input.barcode),
            sku: Set(sku),
            serial_number: Set(input.serial_number),
            quantity: Set(0),
            reserved_quantity: Set(0),
            unit: Set(input.unit.unwrap_or_else(|| "pieces".to_string())),
            location_id: Set(input.location_id),
            condition_status: Set(input
                .condition_status
                .unwrap_or_else(|| "Good".to_string())),
            purchase_date: Set(input.purchase_date),
            purchase_cost: Set(input.purchase_cost),
            supplier_id: Set(input.supplier_id),
            warranty_expiry: Set(input.warranty_expiry),
            expiry_date: Set(input.expiry_date),
            reorder_level: Set(input.reorder_level.unwrap_or(0)),
            max_stock_level: Set(input.max_stock_level.unwrap_or(0)),
            is_active: Set(true),
            is_loanable: Set(input.is_loanable.unwrap_or(true)),
            loan_duration_days: Set(input.loan_duration_days.unwrap_or(7)),
            tags: Set(tags),
            notes: Set(input.notes),
            weight: Set(input.weight),
            dimensions: Set(input.dimensions),
            current_value: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        audit::record(
            db,
            Some(user_id),
            "CREATE",
            "inventory_items",
            Some(item.id),
            None::<&()>,
            Some(&item),
        )
        .await?;

        if opening_quantity > 0 {
            self.record_movement(MovementInput {
                item_id: item.id,
                movement_type: MovementType::In,
                quantity: opening_quantity,
                unit_cost: purchase_cost,
                from_location_id: None,
                to_location_id: item.location_id,
                reference_id: Some(item.id),
                reference_type: Some("initial_stock".to_string()),
                user_id: Some(user_id),
                reason: Some("Opening balance".to_string()),
                notes: None,
            })
            .await?;
        }

        self.alerts.evaluate_item(item.id).await?;

        self.event_sender
            .send(Event::ItemCreated(item.id))
            .await
            .map_err(ServiceError::InternalError)?;

        info!(item_id = item.id, "Created inventory item");
        self.get_item(item.id).await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: i32) -> Result<inventory_item::Model, ServiceError> {
        InventoryItem::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))
    }

    /// Lists items, searching both English and Te Reo Māori names.
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        filter: ItemFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let mut query = InventoryItem::find();

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(inventory_item::Column::NameEn.like(pattern.clone()))
                    .add(inventory_item::Column::NameMi.like(pattern.clone()))
                    .add(inventory_item::Column::Sku.like(pattern.clone()))
                    .add(inventory_item::Column::Barcode.like(pattern)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(inventory_item::Column::CategoryId.eq(category_id));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(inventory_item::Column::LocationId.eq(location_id));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(inventory_item::Column::IsActive.eq(is_active));
        }
        if filter.low_stock_only {
            query = query
                .filter(inventory_item::Column::ReorderLevel.gt(0))
                .filter(
                    Expr::col(inventory_item::Column::Quantity)
                        .lte(Expr::col(inventory_item::Column::ReorderLevel)),
                );
        }

        let paginator = query
            .order_by_asc(inventory_item::Column::NameEn)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Updates an item. A quantity change is written through the ledger as
    /// a signed ADJUSTMENT instead of being stored directly.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        item_id: i32,
        input: UpdateItemInput,
        user_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;

        if let Some(new_quantity) = input.quantity {
            if new_quantity < 0 {
                return Err(ServiceError::ValidationError(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            let diff = new_quantity - item.quantity;
            if diff != 0 {
                self.record_movement(MovementInput {
                    item_id,
                    movement_type: MovementType::Adjustment,
                    quantity: diff,
                    unit_cost: None,
                    from_location_id: None,
                    to_location_id: None,
                    reference_id: None,
                    reference_type: Some("item_update".to_string()),
                    user_id: Some(user_id),
                    reason: Some("Quantity corrected on item update".to_string()),
                    notes: None,
                })
                .await?;
            }
        }

        let tags = match &input.tags {
            Some(tags) => Some(
                serde_json::to_string(tags)
                    .map_err(|e| ServiceError::InternalError(e.to_string()))?,
            ),
            None => None,
        };

        let mut active: inventory_item::ActiveModel = self.get_item(item_id).await?.into();
        if let Some(v) = input.name_en {
            active.name_en = Set(v);
        }
        if let Some(v) = input.name_mi {
            active.name_mi = Set(Some(v));
        }
        if let Some(v) = input.description_en {
            active.description_en = Set(Some(v));
        }
        if let Some(v) = input.description_mi {
            active.description_mi = Set(Some(v));
        }
        if let Some(v) = input.category_id {
            active.category_id = Set(Some(v));
        }
        if let Some(v) = input.barcode {
            active.barcode = Set(Some(v));
        }
        if let Some(v) = input.unit {
            active.unit = Set(v);
        }
        if let Some(v) = input.location_id {
            active.location_id = Set(Some(v));
        }
        if let Some(v) = input.condition_status {
            active.condition_status = Set(v);
        }
        if let Some(v) = input.supplier_id {
            active.supplier_id = Set(Some(v));
        }
        if let Some(v) = input.expiry_date {
            active.expiry_date = Set(Some(v));
        }
        if let Some(v) = input.reorder_level {
            active.reorder_level = Set(v);
        }
        if let Some(v) = input.max_stock_level {
            active.max_stock_level = Set(v);
        }
        if let Some(v) = input.is_loanable {
            active.is_loanable = Set(v);
        }
        if let Some(v) = input.loan_duration_days {
            active.loan_duration_days = Set(v);
        }
        if let Some(v) = tags {
            active.tags = Set(Some(v));
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;

        audit::record(
            &*self.db_pool,
            Some(user_id),
            "UPDATE",
            "inventory_items",
            Some(item_id),
            Some(&item),
            Some(&updated),
        )
        .await?;

        self.alerts.evaluate_item(item_id).await?;

        self.event_sender
            .send(Event::ItemUpdated(item_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Soft-deletes an item. Items with open bookings cannot be removed.
    #[instrument(skip(self))]
    pub async fn deactivate_item(&self, item_id: i32) -> Result<(), ServiceError> {
        let item = self.get_item(item_id).await?;

        let open_statuses = vec![
            BookingStatus::Pending.to_string(),
            BookingStatus::Approved.to_string(),
            BookingStatus::Active.to_string(),
            BookingStatus::Overdue.to_string(),
        ];
        let open_bookings = booking::Entity::find()
            .filter(booking::Column::ItemId.eq(item_id))
            .filter(booking::Column::Status.is_in(open_statuses))
            .count(&*self.db_pool)
            .await?;

        if open_bookings > 0 {
            return Err(ServiceError::InvalidOperation(
                "Item has open bookings and cannot be removed".to_string(),
            ));
        }

        audit::record(
            &*self.db_pool,
            None,
            "DEACTIVATE",
            "inventory_items",
            Some(item_id),
            Some(&item),
            None::<&()>,
        )
        .await?;

        let mut active: inventory_item::ActiveModel = item.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::ItemDeactivated(item_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(())
    }

    /// Records one ledger entry and applies its effect atomically, then
    /// re-evaluates alerts. A costed IN also refreshes the item's average
    /// valuation.
    #[instrument(skip(self, input), fields(item_id = input.item_id))]
    pub async fn record_movement(
        &self,
        input: MovementInput,
    ) -> Result<stock_movement::Model, ServiceError> {
        let movement = self
            .db_pool
            .transaction::<_, stock_movement::Model, ServiceError>(move |txn| {
                Box::pin(async move { apply_movement(txn, &input).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.alerts.evaluate_item(movement.item_id).await?;

        if movement.movement_type == MovementType::In.to_string() && movement.unit_cost.is_some() {
            if let Some(result) =
                valuation::revalue(&*self.db_pool, movement.item_id, ValuationMethod::Average)
                    .await?
            {
                self.event_sender
                    .send(Event::ItemRevalued {
                        item_id: movement.item_id,
                        method: result.method.to_string(),
                        total_value: result.total_value,
                    })
                    .await
                    .map_err(ServiceError::InternalError)?;
            }
        }

        self.event_sender
            .send(Event::StockMovementRecorded {
                movement_id: movement.id,
                item_id: movement.item_id,
                movement_type: movement.movement_type.clone(),
                quantity: movement.quantity,
            })
            .await
            .map_err(ServiceError::InternalError)?;

        info!(
            movement_id = movement.id,
            item_id = movement.item_id,
            movement_type = %movement.movement_type,
            "Recorded stock movement"
        );

        Ok(movement)
    }

    /// Applies a batch of signed corrections, one ADJUSTMENT per line.
    #[instrument(skip(self, lines))]
    pub async fn bulk_adjust(
        &self,
        lines: Vec<BulkAdjustmentLine>,
        user_id: i32,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        let mut recorded = Vec::with_capacity(lines.len());

        for line in lines {
            let movement = self
                .record_movement(MovementInput {
                    item_id: line.item_id,
                    movement_type: MovementType::Adjustment,
                    quantity: line.quantity_change,
                    unit_cost: None,
                    from_location_id: None,
                    to_location_id: None,
                    reference_id: None,
                    reference_type: Some("bulk_adjustment".to_string()),
                    user_id: Some(user_id),
                    reason: line.reason,
                    notes: None,
                })
                .await?;
            recorded.push(movement);
        }

        Ok(recorded)
    }

    /// Lists ledger entries, newest first.
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let mut query = StockMovement::find();

        if let Some(item_id) = filter.item_id {
            query = query.filter(stock_movement::Column::ItemId.eq(item_id));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query.filter(stock_movement::Column::MovementType.eq(movement_type.to_string()));
        }

        let paginator = query
            .order_by_desc(stock_movement::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let movements = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((movements, total))
    }

    #[instrument(skip(self))]
    pub async fn create_variant(
        &self,
        item_id: i32,
        variant_name: String,
        variant_value: String,
        sku: Option<String>,
        barcode: Option<String>,
        quantity: i32,
        additional_cost: Option<Decimal>,
    ) -> Result<product_variant::Model, ServiceError> {
        // Parent must exist and be active
        InventoryItem::find_by_id(item_id)
            .filter(inventory_item::Column::IsActive.eq(true))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        let variant = product_variant::ActiveModel {
            parent_item_id: Set(item_id),
            variant_name: Set(variant_name),
            variant_value: Set(variant_value),
            sku: Set(sku),
            barcode: Set(barcode),
            quantity: Set(quantity),
            additional_cost: Set(additional_cost.unwrap_or(Decimal::ZERO)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        Ok(variant)
    }

    #[instrument(skip(self))]
    pub async fn list_variants(
        &self,
        item_id: i32,
    ) -> Result<Vec<product_variant::Model>, ServiceError> {
        let variants = product_variant::Entity::find()
            .filter(product_variant::Column::ParentItemId.eq(item_id))
            .order_by_asc(product_variant::Column::Id)
            .all(&*self.db_pool)
            .await?;
        Ok(variants)
    }

    /// Derives a SKU from the category name, falling back to a generic
    /// prefix for uncategorised items.
    async fn generate_sku(&self, category_id: Option<i32>) -> Result<String, ServiceError> {
        let prefix = match category_id {
            Some(id) => match category::Entity::find_by_id(id).one(&*self.db_pool).await? {
                Some(cat) => {
                    let letters: String = cat
                        .name_en
                        .chars()
                        .filter(|c| c.is_ascii_alphabetic())
                        .take(3)
                        .collect::<String>()
                        .to_ascii_uppercase();
                    if letters.is_empty() {
                        "ITM".to_string()
                    } else {
                        letters
                    }
                }
                None => "ITM".to_string(),
            },
            None => "ITM".to_string(),
        };

        let count = InventoryItem::find().count(&*self.db_pool).await?;
        Ok(format!("{}-{:04}", prefix, count + 1))
    }
}
