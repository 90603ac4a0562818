use crate::{
    entities::{
        booking::{self, BookingStatus, Entity as Booking},
        inventory_item::{self, Entity as InventoryItem},
        stock_movement::MovementType,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        alerts::AlertService,
        inventory::{apply_movement, MovementInput},
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub item_id: i32,
    pub kaupapa_name: String,
    pub kaupapa_description: Option<String>,
    pub whanau_group: Option<String>,
    pub quantity_requested: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReturnBookingInput {
    pub return_condition: Option<String>,
    pub damage_assessment: Option<String>,
    pub damage_fee: Option<Decimal>,
}

/// Booking lifecycle:
/// Pending -> Approved -> Active -> Returned, with Declined, Cancelled and
/// Overdue branching off. Stock only moves at checkout and return.
#[derive(Clone)]
pub struct BookingService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: AlertService,
    late_fee_per_day: Decimal,
}

impl BookingService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        alerts: AlertService,
        late_fee_per_day: Decimal,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            alerts,
            late_fee_per_day,
        }
    }

    /// Creates a booking request for a loanable item.
    #[instrument(skip(self, input))]
    pub async fn create_booking(
        &self,
        user_id: i32,
        input: CreateBookingInput,
    ) -> Result<booking::Model, ServiceError> {
        if input.quantity_requested <= 0 {
            return Err(ServiceError::ValidationError(
                "Quantity requested must be positive".to_string(),
            ));
        }
        if input.end_date < input.start_date {
            return Err(ServiceError::ValidationError(
                "End date must not be before the start date".to_string(),
            ));
        }

        let item = InventoryItem::find_by_id(input.item_id)
            .filter(inventory_item::Column::IsActive.eq(true))
            .filter(inventory_item::Column::IsLoanable.eq(true))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("Item not found or not available for booking".to_string())
            })?;

        if item.quantity < input.quantity_requested {
            return Err(ServiceError::InsufficientStock(format!(
                "Only {} items available",
                item.quantity
            )));
        }

        let now = Utc::now();
        let created = booking::ActiveModel {
            item_id: Set(input.item_id),
            user_id: Set(user_id),
            kaupapa_name: Set(input.kaupapa_name),
            kaupapa_description: Set(input.kaupapa_description),
            whanau_group: Set(input.whanau_group),
            quantity_requested: Set(input.quantity_requested),
            booking_date: Set(now.date_naive()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(BookingStatus::Pending.to_string()),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        self.event_sender
            .send(Event::BookingCreated(created.id))
            .await
            .map_err(ServiceError::InternalError)?;

        info!(booking_id = created.id, item_id = created.item_id, "Created booking");
        Ok(created)
    }

    /// Approves a pending booking and reserves the quantity on the item.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        booking_id: i32,
        approver_id: i32,
    ) -> Result<booking::Model, ServiceError> {
        let record = self.require_status(booking_id, &[BookingStatus::Pending]).await?;

        self.adjust_reservation(record.item_id, record.quantity_requested)
            .await?;

        let mut active: booking::ActiveModel = record.into();
        active.status = Set(BookingStatus::Approved.to_string());
        active.approved_by = Set(Some(approver_id));
        active.approved_at = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::BookingApproved(booking_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Declines a pending booking.
    #[instrument(skip(self))]
    pub async fn decline(
        &self,
        booking_id: i32,
        reviewer_id: i32,
        reason: Option<String>,
    ) -> Result<booking::Model, ServiceError> {
        let record = self.require_status(booking_id, &[BookingStatus::Pending]).await?;

        let mut active: booking::ActiveModel = record.into();
        active.status = Set(BookingStatus::Declined.to_string());
        active.approved_by = Set(Some(reviewer_id));
        active.approved_at = Set(Some(Utc::now()));
        if let Some(reason) = reason {
            active.notes = Set(Some(reason));
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::BookingDeclined(booking_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Cancels a booking. Members may cancel their own; kaimahi may cancel
    /// any. Only pending and approved bookings can be cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        booking_id: i32,
        user_id: i32,
        is_staff: bool,
    ) -> Result<booking::Model, ServiceError> {
        let record = self
            .require_status(booking_id, &[BookingStatus::Pending, BookingStatus::Approved])
            .await?;

        if !is_staff && record.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the booking owner can cancel it".to_string(),
            ));
        }

        if record.status == BookingStatus::Approved.to_string() {
            self.adjust_reservation(record.item_id, -record.quantity_requested)
                .await?;
        }

        let mut active: booking::ActiveModel = record.into();
        active.status = Set(BookingStatus::Cancelled.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::BookingCancelled(booking_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Hands the items over: the OUT movement, the reservation release and
    /// the Active status commit together so a failure cannot deduct stock
    /// while the booking stays Approved.
    #[instrument(skip(self))]
    pub async fn checkout(
        &self,
        booking_id: i32,
        staff_user_id: i32,
    ) -> Result<booking::Model, ServiceError> {
        let updated = self
            .db_pool
            .transaction::<_, booking::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let record = fetch_with_status(txn, booking_id, &[BookingStatus::Approved])
                        .await?;

                    apply_movement(
                        txn,
                        &MovementInput {
                            item_id: record.item_id,
                            movement_type: MovementType::Out,
                            quantity: record.quantity_requested,
                            unit_cost: None,
                            from_location_id: None,
                            to_location_id: None,
                            reference_id: Some(record.id),
                            reference_type: Some("booking".to_string()),
                            user_id: Some(staff_user_id),
                            reason: Some(format!("Checked out for {}", record.kaupapa_name)),
                            notes: None,
                        },
                    )
                    .await?;

                    adjust_reservation(txn, record.item_id, -record.quantity_requested).await?;

                    let mut active: booking::ActiveModel = record.into();
                    active.status = Set(BookingStatus::Active.to_string());
                    active.updated_at = Set(Utc::now());
                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.alerts.evaluate_item(updated.item_id).await?;

        self.event_sender
            .send(Event::BookingCheckedOut(booking_id))
            .await
            .map_err(ServiceError::InternalError)?;

        Ok(updated)
    }

    /// Takes the items back: the RETURN movement and the status change
    /// commit together. A late fee is charged per day past the agreed end
    /// date.
    #[instrument(skip(self, input))]
    pub async fn return_booking(
        &self,
        booking_id: i32,
        staff_user_id: i32,
        input: ReturnBookingInput,
    ) -> Result<booking::Model, ServiceError> {
        let late_fee_per_day = self.late_fee_per_day;

        let updated = self
            .db_pool
            .transaction::<_, booking::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let record = fetch_with_status(
                        txn,
                        booking_id,
                        &[BookingStatus::Active, BookingStatus::Overdue],
                    )
                    .await?;

                    apply_movement(
                        txn,
                        &MovementInput {
                            item_id: record.item_id,
                            movement_type: MovementType::Return,
                            quantity: record.quantity_requested,
                            unit_cost: None,
                            from_location_id: None,
                            to_location_id: None,
                            reference_id: Some(record.id),
                            reference_type: Some("booking".to_string()),
                            user_id: Some(staff_user_id),
                            reason: Some(format!("Returned from {}", record.kaupapa_name)),
                            notes: None,
                        },
                    )
                    .await?;

                    let today = Utc::now().date_naive();
                    let days_late = (today - record.end_date).num_days();
                    let late_fee = if days_late > 0 {
                        Some(Decimal::from(days_late) * late_fee_per_day)
                    } else {
                        None
                    };

                    let mut active: booking::ActiveModel = record.into();
                    active.status = Set(BookingStatus::Returned.to_string());
                    active.return_date = Set(Some(today));
                    active.return_condition = Set(input.return_condition);
                    active.damage_assessment = Set(input.damage_assessment);
                    active.late_return_fee = Set(late_fee);
                    active.damage_fee = Set(input.damage_fee);
                    active.updated_at = Set(Utc::now());
                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.alerts.evaluate_item(updated.item_id).await?;

        self.event_sender
            .send(Event::BookingReturned(booking_id))
            .await
            .map_err(ServiceError::InternalError)?;

        info!(booking_id, "Booking returned");
        Ok(updated)
    }

    /// Flags checked-out bookings whose end date has passed.
    #[instrument(skip(self))]
    pub async fn mark_overdue(&self) -> Result<u64, ServiceError> {
        let today = Utc::now().date_naive();
        let result = Booking::update_many()
            .col_expr(
                booking::Column::Status,
                Expr::value(BookingStatus::Overdue.to_string()),
            )
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(booking::Column::Status.eq(BookingStatus::Active.to_string()))
            .filter(booking::Column::EndDate.lt(today))
            .exec(&*self.db_pool)
            .await?;

        Ok(result.rows_affected)
    }

    /// Fetches one booking. Members only see their own.
    #[instrument(skip(self))]
    pub async fn get_booking(
        &self,
        booking_id: i32,
        user_id: i32,
        is_staff: bool,
    ) -> Result<booking::Model, ServiceError> {
        let record = Booking::find_by_id(booking_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Booking not found".to_string()))?;

        if !is_staff && record.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "You do not have access to this booking".to_string(),
            ));
        }

        Ok(record)
    }

    /// Lists bookings. Staff see every booking; members see their own.
    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        user_id: i32,
        is_staff: bool,
        status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<booking::Model>, u64), ServiceError> {
        let mut query = Booking::find();

        if !is_staff {
            query = query.filter(booking::Column::UserId.eq(user_id));
        }
        if let Some(status) = status {
            let status = BookingStatus::from_str(&status)
                .map_err(ServiceError::ValidationError)?;
            query = query.filter(booking::Column::Status.eq(status.to_string()));
        }

        let paginator = query
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let bookings = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((bookings, total))
    }

    async fn require_status(
        &self,
        booking_id: i32,
        allowed: &[BookingStatus],
    ) -> Result<booking::Model, ServiceError> {
        fetch_with_status(&*self.db_pool, booking_id, allowed).await
    }

    async fn adjust_reservation(&self, item_id: i32, delta: i32) -> Result<(), ServiceError> {
        adjust_reservation(&*self.db_pool, item_id, delta).await
    }
}

async fn fetch_with_status<C: ConnectionTrait>(
    conn: &C,
    booking_id: i32,
    allowed: &[BookingStatus],
) -> Result<booking::Model, ServiceError> {
    let record = Booking::find_by_id(booking_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Booking not found".to_string()))?;

    if !allowed.iter().any(|s| s.to_string() == record.status) {
        return Err(ServiceError::InvalidOperation(format!(
            "Booking is {} and cannot be changed this way",
            record.status
        )));
    }

    Ok(record)
}

async fn adjust_reservation<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    delta: i32,
) -> Result<(), ServiceError> {
    InventoryItem::update_many()
        .col_expr(
            inventory_item::Column::ReservedQuantity,
            Expr::col(inventory_item::Column::ReservedQuantity).add(delta),
        )
        .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(inventory_item::Column::Id.eq(item_id))
        .exec(conn)
        .await?;
    Ok(())
}

fn unwrap_transaction_error(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
