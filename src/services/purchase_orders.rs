use crate::{
    entities::{
        goods_received_note::{self, Entity as GoodsReceivedNote},
        grn_item,
        inventory_item::{self, Entity as InventoryItem},
        inventory_valuation::ValuationMethod,
        purchase_order::{self, Entity as PurchaseOrder, PurchaseOrderStatus},
        purchase_order_item::{self, Entity as PurchaseOrderItem},
        stock_movement::MovementType,
        supplier::Entity as Supplier,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        alerts::AlertService,
        audit,
        inventory::{apply_movement, MovementInput},
        valuation,
    },
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct PurchaseOrderLineInput {
    pub item_id: Option<i32>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: i32,
    pub expected_delivery_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub lines: Vec<PurchaseOrderLineInput>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseOrderInput {
    pub expected_delivery_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReceiptLineInput {
    pub purchase_order_item_id: i32,
    pub quantity_received: i32,
    pub condition_status: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReceiveGoodsInput {
    pub notes: Option<String>,
    pub lines: Vec<ReceiptLineInput>,
}

/// A purchase order with its lines.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub order: purchase_order::Model,
    pub lines: Vec<purchase_order_item::Model>,
}

/// Outcome of a goods receipt.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GoodsReceiptResult {
    pub grn: goods_received_note::Model,
    pub order_status: String,
}

/// Purchase orders and goods receiving. Receipts are applied in one
/// transaction so a failing line leaves no partial stock behind.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: AlertService,
    default_tax_rate: Decimal,
}

impl PurchaseOrderService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        alerts: AlertService,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            alerts,
            default_tax_rate,
        }
    }

    /// Creates a draft purchase order. Totals are derived from the lines;
    /// each line carries its own tax rate.
    #[instrument(skip(self, input))]
    pub async fn create_order(
        &self,
        input: CreatePurchaseOrderInput,
        created_by: i32,
    ) -> Result<PurchaseOrderDetail, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A purchase order needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.quantity <= 0 {
                return Err(ServiceError::ValidationError(
                    "Line quantity must be positive".to_string(),
                ));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Line unit price cannot be negative".to_string(),
                ));
            }
        }

        let supplier_record = Supplier::find_by_id(input.supplier_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supplier not found".to_string()))?;
        if !supplier_record.is_active {
            return Err(ServiceError::InvalidOperation(
                "Supplier is inactive".to_string(),
            ));
        }

        let po_number = self.generate_po_number().await?;
        let default_tax_rate = self.default_tax_rate;

        let detail = self
            .db_pool
            .transaction::<_, PurchaseOrderDetail, ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    let mut subtotal = Decimal::ZERO;
                    let mut tax_amount = Decimal::ZERO;
                    for line in &input.lines {
                        let line_total = line.unit_price * Decimal::from(line.quantity);
                        subtotal += line_total;
                        tax_amount += line_total * line.tax_rate.unwrap_or(default_tax_rate);
                    }
                    let subtotal = subtotal.round_dp(4);
                    let tax_amount = tax_amount.round_dp(4);

                    let order = purchase_order::ActiveModel {
                        po_number: Set(po_number),
                        supplier_id: Set(input.supplier_id),
                        status: Set(PurchaseOrderStatus::Draft.to_string()),
                        order_date: Set(now.date_naive()),
                        expected_delivery_date: Set(input.expected_delivery_date),
                        subtotal: Set(subtotal),
                        tax_amount: Set(tax_amount),
                        total_amount: Set(subtotal + tax_amount),
                        currency: Set(input
                            .currency
                            .unwrap_or_else(|| supplier_record.currency.clone())),
                        payment_terms: Set(input
                            .payment_terms
                            .unwrap_or_else(|| supplier_record.payment_terms.clone())),
                        delivery_address: Set(input.delivery_address),
                        notes: Set(input.notes),
                        created_by: Set(created_by),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let mut lines = Vec::with_capacity(input.lines.len());
                    for line in input.lines {
                        let line_total = line.unit_price * Decimal::from(line.quantity);
                        let inserted = purchase_order_item::ActiveModel {
                            purchase_order_id: Set(order.id),
                            item_id: Set(line.item_id),
                            description: Set(line.description),
                            quantity: Set(line.quantity),
                            unit_price: Set(line.unit_price),
                            tax_rate: Set(line.tax_rate.unwrap_or(default_tax_rate)),
                            total_price: Set(line_total.round_dp(4)),
                            received_quantity: Set(0),
                            created_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                        lines.push(inserted);
                    }

                    audit::record(
                        txn,
                        Some(created_by),
                        "PURCHASE",
                        "purchase_orders",
                        Some(order.id),
                        None::<&()>,
                        Some(&serde_json::json!({
                            "po_number": order.po_number,
                            "supplier_id": order.supplier_id,
                            "subtotal": order.subtotal,
                            "tax_amount": order.tax_amount,
                            "total_amount": order.total_amount,
                            "currency": order.currency,
                        })),
                    )
                    .await?;

                    Ok(PurchaseOrderDetail { order, lines })
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send(Event::PurchaseOrderCreated(detail.order.id))
            .await
            .map_err(ServiceError::InternalError)?;

        info!(
            po_id = detail.order.id,
            po_number = %detail.order.po_number,
            "Created purchase order"
        );
        Ok(detail)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, po_id: i32) -> Result<PurchaseOrderDetail, ServiceError> {
        let order = PurchaseOrder::find_by_id(po_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))?;
        let lines = PurchaseOrderItem::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(po_id))
            .order_by_asc(purchase_order_item::Column::Id)
            .all(&*self.db_pool)
            .await?;
        Ok(PurchaseOrderDetail { order, lines })
    }

    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<String>,
        supplier_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = PurchaseOrder::find();
        if let Some(status) = status {
            let status = PurchaseOrderStatus::from_str(&status)
                .map_err(ServiceError::ValidationError)?;
            query = query.filter(purchase_order::Column::Status.eq(status.to_string()));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query
            .order_by_desc(purchase_order::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((orders, total))
    }

    /// Updates header fields. Orders that are fully received or cancelled
    /// reject changes.
    #[instrument(skip(self, input))]
    pub async fn update_order(
        &self,
        po_id: i32,
        input: UpdatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let order = PurchaseOrder::find_by_id(po_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))?;

        let status = PurchaseOrderStatus::from_str(&order.status)
            .map_err(ServiceError::InternalError)?;
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation(
                "Cannot update a completed purchase order".to_string(),
            ));
        }

        let mut active: purchase_order::ActiveModel = order.into();
        if let Some(v) = input.expected_delivery_date {
            active.expected_delivery_date = Set(Some(v));
        }
        if let Some(v) = input.payment_terms {
            active.payment_terms = Set(v);
        }
        if let Some(v) = input.delivery_address {
            active.delivery_address = Set(Some(v));
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        Ok(updated)
    }

    /// Moves an order along its lifecycle. Confirmation stamps the
    /// approver; terminal orders cannot move again.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        po_id: i32,
        new_status: PurchaseOrderStatus,
        user_id: i32,
    ) -> Result<purchase_order::Model, ServiceError> {
        let order = PurchaseOrder::find_by_id(po_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))?;

        let old_status = PurchaseOrderStatus::from_str(&order.status)
            .map_err(ServiceError::InternalError)?;
        if old_status.is_terminal() {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase order is {} and cannot change status",
                order.status
            )));
        }

        let old_status_string = order.status.clone();
        let mut active: purchase_order::ActiveModel = order.into();
        active.status = Set(new_status.to_string());
        if new_status == PurchaseOrderStatus::Confirmed {
            active.approved_by = Set(Some(user_id));
            active.approved_at = Set(Some(Utc::now()));
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        audit::record(
            &*self.db_pool,
            Some(user_id),
            "STATUS_CHANGE",
            "purchase_orders",
            Some(po_id),
            Some(&old_status_string),
            Some(&new_status.to_string()),
        )
        .await?;

        self.event_sender
            .send(Event::PurchaseOrderStatusChanged {
                po_id,
                old_status: old_status_string,
                new_status: new_status.to_string(),
            })
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Receives goods against a confirmed order. The GRN, its lines, the
    /// stock movements and the order status all commit together.
    #[instrument(skip(self, input))]
    pub async fn receive_goods(
        &self,
        po_id: i32,
        input: ReceiveGoodsInput,
        received_by: i32,
    ) -> Result<GoodsReceiptResult, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A goods receipt needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.quantity_received <= 0 {
                return Err(ServiceError::ValidationError(
                    "Received quantity must be positive".to_string(),
                ));
            }
        }

        let (grn, old_status, new_status, affected_items) = self
            .db_pool
            .transaction::<_, (goods_received_note::Model, String, PurchaseOrderStatus, Vec<i32>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let order = PurchaseOrder::find_by_id(po_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound("Purchase order not found".to_string())
                            })?;

                        let status = PurchaseOrderStatus::from_str(&order.status)
                            .map_err(ServiceError::InternalError)?;
                        if !status.can_receive() {
                            return Err(ServiceError::InvalidOperation(format!(
                                "Purchase order is {} and cannot receive goods",
                                order.status
                            )));
                        }

                        let now = Utc::now();
                        let today = now.date_naive();
                        let grn_number =
                            format!("GRN-{}-{:04}", today.format("%Y%m%d"), order.id);

                        let grn = goods_received_note::ActiveModel {
                            grn_number: Set(grn_number),
                            purchase_order_id: Set(order.id),
                            received_date: Set(today),
                            received_by: Set(received_by),
                            notes: Set(input.notes),
                            created_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;

                        let mut affected_items = Vec::new();

                        for line in input.lines {
                            let po_line =
                                PurchaseOrderItem::find_by_id(line.purchase_order_item_id)
                                    .one(txn)
                                    .await?
                                    .ok_or_else(|| {
                                        ServiceError::NotFound(
                                            "Purchase order line not found".to_string(),
                                        )
                                    })?;
                            if po_line.purchase_order_id != order.id {
                                return Err(ServiceError::InvalidOperation(
                                    "Line does not belong to this purchase order".to_string(),
                                ));
                            }

                            grn_item::ActiveModel {
                                grn_id: Set(grn.id),
                                purchase_order_item_id: Set(po_line.id),
                                quantity_received: Set(line.quantity_received),
                                condition_status: Set(line.condition_status.clone()),
                                expiry_date: Set(line.expiry_date),
                                batch_number: Set(line.batch_number.clone()),
                                notes: Set(line.notes.clone()),
                                created_at: Set(now),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?;

                            let received_so_far = po_line.received_quantity;
                            let unit_price = po_line.unit_price;
                            let item_id = po_line.item_id;

                            let mut line_active: purchase_order_item::ActiveModel =
                                po_line.into();
                            line_active.received_quantity =
                                Set(received_so_far + line.quantity_received);
                            line_active.update(txn).await?;

                            if let Some(item_id) = item_id {
                                apply_movement(
                                    txn,
                                    &MovementInput {
                                        item_id,
                                        movement_type: MovementType::In,
                                        quantity: line.quantity_received,
                                        unit_cost: Some(unit_price),
                                        from_location_id: None,
                                        to_location_id: None,
                                        reference_id: Some(grn.id),
                                        reference_type: Some("grn".to_string()),
                                        user_id: Some(received_by),
                                        reason: Some("Goods received".to_string()),
                                        notes: line.batch_number.clone(),
                                    },
                                )
                                .await?;

                                if line.condition_status.is_some() || line.expiry_date.is_some() {
                                    let item = InventoryItem::find_by_id(item_id)
                                        .one(txn)
                                        .await?
                                        .ok_or_else(|| {
                                            ServiceError::NotFound("Item not found".to_string())
                                        })?;
                                    let mut item_active: inventory_item::ActiveModel =
                                        item.into();
                                    if let Some(condition) = line.condition_status.clone() {
                                        item_active.condition_status = Set(condition);
                                    }
                                    if let Some(expiry) = line.expiry_date {
                                        item_active.expiry_date = Set(Some(expiry));
                                    }
                                    item_active.updated_at = Set(now);
                                    item_active.update(txn).await?;
                                }

                                affected_items.push(item_id);
                            }
                        }

                        // Recompute completion from every line on the order
                        let all_lines = PurchaseOrderItem::find()
                            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order.id))
                            .all(txn)
                            .await?;
                        let total_ordered: i64 =
                            all_lines.iter().map(|l| l.quantity as i64).sum();
                        let total_received: i64 =
                            all_lines.iter().map(|l| l.received_quantity as i64).sum();

                        let new_status = if total_received >= total_ordered {
                            PurchaseOrderStatus::Received
                        } else if total_received > 0 {
                            PurchaseOrderStatus::PartiallyReceived
                        } else {
                            status
                        };

                        let old_status = order.status.clone();
                        let mut order_active: purchase_order::ActiveModel = order.into();
                        order_active.status = Set(new_status.to_string());
                        if new_status == PurchaseOrderStatus::Received {
                            order_active.actual_delivery_date = Set(Some(today));
                        }
                        order_active.updated_at = Set(now);
                        order_active.update(txn).await?;

                        Ok((grn, old_status, new_status, affected_items))
                    })
                },
            )
            .await
            .map_err(unwrap_transaction_error)?;

        for item_id in &affected_items {
            self.alerts.evaluate_item(*item_id).await?;
            if let Some(result) =
                valuation::revalue(&*self.db_pool, *item_id, ValuationMethod::Average).await?
            {
                self.event_sender
                    .send(Event::ItemRevalued {
                        item_id: *item_id,
                        method: result.method.to_string(),
                        total_value: result.total_value,
                    })
                    .await
                    .map_err(ServiceError::InternalError)?;
            }
        }

        self.event_sender
            .send(Event::GoodsReceived {
                grn_id: grn.id,
                po_id,
            })
            .await
            .map_err(ServiceError::InternalError)?;

        if old_status != new_status.to_string() {
            self.event_sender
                .send(Event::PurchaseOrderStatusChanged {
                    po_id,
                    old_status,
                    new_status: new_status.to_string(),
                })
                .await
                .map_err(ServiceError::InternalError)?;
        }

        info!(grn_id = grn.id, po_id, "Received goods");
        Ok(GoodsReceiptResult {
            grn,
            order_status: new_status.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_receipts(
        &self,
        po_id: i32,
    ) -> Result<Vec<goods_received_note::Model>, ServiceError> {
        let receipts = GoodsReceivedNote::find()
            .filter(goods_received_note::Column::PurchaseOrderId.eq(po_id))
            .order_by_desc(goods_received_note::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;
        Ok(receipts)
    }

    /// Numbers run per calendar year: PO-2026-0001, PO-2026-0002, ...
    async fn generate_po_number(&self) -> Result<String, ServiceError> {
        let today = Utc::now().date_naive();
        let year = today.year();
        let year_start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| ServiceError::InternalError("Invalid calendar year".to_string()))?;

        let count = PurchaseOrder::find()
            .filter(purchase_order::Column::OrderDate.gte(year_start))
            .count(&*self.db_pool)
            .await?;

        Ok(format!("PO-{}-{:04}", year, count + 1))
    }
}

fn unwrap_transaction_error(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
