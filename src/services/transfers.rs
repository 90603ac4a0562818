use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        location,
        stock_movement::MovementType,
        stock_transfer::{self, Entity as StockTransfer, TransferStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{apply_movement, MovementInput},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    pub item_id: i32,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub quantity: i32,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Stock transfers between locations. Stock is only relocated when the
/// transfer completes, via a TRANSFER ledger entry.
#[derive(Clone)]
pub struct TransferService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl TransferService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn request_transfer(
        &self,
        input: CreateTransferInput,
        requested_by: i32,
    ) -> Result<stock_transfer::Model, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Transfer quantity must be positive".to_string(),
            ));
        }
        if input.from_location_id == input.to_location_id {
            return Err(ServiceError::ValidationError(
                "Source and destination locations must differ".to_string(),
            ));
        }

        let item = InventoryItem::find_by_id(input.item_id)
            .filter(inventory_item::Column::IsActive.eq(true))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        if item.quantity < input.quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "Only {} items available",
                item.quantity
            )));
        }

        for location_id in [input.from_location_id, input.to_location_id] {
            location::Entity::find_by_id(location_id)
                .filter(location::Column::IsActive.eq(true))
                .one(&*self.db_pool)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Location not found".to_string()))?;
        }

        let now = Utc::now();
        let transfer_number = self.generate_transfer_number().await?;

        let created = stock_transfer::ActiveModel {
            transfer_number: Set(transfer_number),
            item_id: Set(input.item_id),
            from_location_id: Set(input.from_location_id),
            to_location_id: Set(input.to_location_id),
            quantity: Set(input.quantity),
            status: Set(TransferStatus::Pending.to_string()),
            requested_by: Set(requested_by),
            reason: Set(input.reason),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        self.event_sender
            .send(Event::TransferRequested(created.id))
            .await
            .map_err(ServiceError::InternalError)?;

        info!(transfer_id = created.id, "Requested stock transfer");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        transfer_id: i32,
        approver_id: i32,
    ) -> Result<stock_transfer::Model, ServiceError> {
        let record = self
            .require_status(transfer_id, &[TransferStatus::Pending])
            .await?;

        let mut active: stock_transfer::ActiveModel = record.into();
        active.status = Set(TransferStatus::Approved.to_string());
        active.approved_by = Set(Some(approver_id));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::TransferApproved(transfer_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Completes an approved transfer: the TRANSFER ledger entry, the
    /// relocation and the status change commit together, so a failure
    /// leaves the transfer approved and the stock untouched.
    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        transfer_id: i32,
        received_by: i32,
    ) -> Result<stock_transfer::Model, ServiceError> {
        let updated = self
            .db_pool
            .transaction::<_, stock_transfer::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let record = StockTransfer::find_by_id(transfer_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound("Transfer not found".to_string())
                        })?;
                    if record.status != TransferStatus::Approved.to_string() {
                        return Err(ServiceError::InvalidOperation(format!(
                            "Transfer is {} and cannot be changed this way",
                            record.status
                        )));
                    }

                    apply_movement(
                        txn,
                        &MovementInput {
                            item_id: record.item_id,
                            movement_type: MovementType::Transfer,
                            quantity: record.quantity,
                            unit_cost: None,
                            from_location_id: Some(record.from_location_id),
                            to_location_id: Some(record.to_location_id),
                            reference_id: Some(record.id),
                            reference_type: Some("transfer".to_string()),
                            user_id: Some(received_by),
                            reason: record.reason.clone(),
                            notes: None,
                        },
                    )
                    .await?;

                    let mut active: stock_transfer::ActiveModel = record.into();
                    active.status = Set(TransferStatus::Completed.to_string());
                    active.received_by = Set(Some(received_by));
                    active.completed_at = Set(Some(Utc::now()));
                    active.updated_at = Set(Utc::now());
                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::TransferCompleted(transfer_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, transfer_id: i32) -> Result<stock_transfer::Model, ServiceError> {
        let record = self
            .require_status(
                transfer_id,
                &[TransferStatus::Pending, TransferStatus::Approved],
            )
            .await?;

        let mut active: stock_transfer::ActiveModel = record.into();
        active.status = Set(TransferStatus::Cancelled.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::TransferCancelled(transfer_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get_transfer(
        &self,
        transfer_id: i32,
    ) -> Result<stock_transfer::Model, ServiceError> {
        StockTransfer::find_by_id(transfer_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Transfer not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_transfers(
        &self,
        status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_transfer::Model>, u64), ServiceError> {
        let mut query = StockTransfer::find();
        if let Some(status) = status {
            query = query.filter(stock_transfer::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(stock_transfer::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let transfers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((transfers, total))
    }

    async fn require_status(
        &self,
        transfer_id: i32,
        allowed: &[TransferStatus],
    ) -> Result<stock_transfer::Model, ServiceError> {
        let record = self.get_transfer(transfer_id).await?;

        if !allowed.iter().any(|s| s.to_string() == record.status) {
            return Err(ServiceError::InvalidOperation(format!(
                "Transfer is {} and cannot be changed this way",
                record.status
            )));
        }

        Ok(record)
    }

    async fn generate_transfer_number(&self) -> Result<String, ServiceError> {
        let count = StockTransfer::find().count(&*self.db_pool).await?;
        let today = Utc::now().date_naive().format("%Y%m%d");
        Ok(format!("TR-{}-{:04}", today, count + 1))
    }
}
