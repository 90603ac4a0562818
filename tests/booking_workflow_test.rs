mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use kaiwhakarite_api::{
    entities::{booking::BookingStatus, user::UserRole},
    errors::ServiceError,
    services::bookings::{CreateBookingInput, ReturnBookingInput},
};
use rust_decimal_macros::dec;

fn booking_input(item_id: i32, quantity: i32, start_offset: i64, end_offset: i64) -> CreateBookingInput {
    let today = Utc::now().date_naive();
    CreateBookingInput {
        item_id,
        kaupapa_name: "Tangi at the marae".to_string(),
        kaupapa_description: None,
        whanau_group: Some("Ngāti Test".to_string()),
        quantity_requested: quantity,
        start_date: today + Duration::days(start_offset),
        end_date: today + Duration::days(end_offset),
        notes: None,
    }
}

#[tokio::test]
async fn booking_lifecycle_moves_stock_at_checkout_and_return() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Marquee", 3), staff.id)
        .await
        .unwrap();

    let booking = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 2, 1, 4))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending.to_string());

    let approved = ctx.services.bookings.approve(booking.id, staff.id).await.unwrap();
    assert_eq!(approved.status, BookingStatus::Approved.to_string());
    assert_eq!(approved.approved_by, Some(staff.id));

    // Approval reserves but does not move stock
    let reserved = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(reserved.quantity, 3);
    assert_eq!(reserved.reserved_quantity, 2);

    let active = ctx.services.bookings.checkout(booking.id, staff.id).await.unwrap();
    assert_eq!(active.status, BookingStatus::Active.to_string());

    let checked_out = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(checked_out.quantity, 1);
    assert_eq!(checked_out.reserved_quantity, 0);

    let returned = ctx
        .services
        .bookings
        .return_booking(booking.id, staff.id, ReturnBookingInput::default())
        .await
        .unwrap();
    assert_eq!(returned.status, BookingStatus::Returned.to_string());
    assert!(returned.late_return_fee.is_none());

    let restored = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(restored.quantity, 3);
}

#[tokio::test]
async fn late_return_charges_a_daily_fee() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("PA system", 1), staff.id)
        .await
        .unwrap();

    // Loan period already ended three days ago
    let booking = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 1, -10, -3))
        .await
        .unwrap();
    ctx.services.bookings.approve(booking.id, staff.id).await.unwrap();
    ctx.services.bookings.checkout(booking.id, staff.id).await.unwrap();

    let overdue = ctx.services.bookings.mark_overdue().await.unwrap();
    assert_eq!(overdue, 1);

    let returned = ctx
        .services
        .bookings
        .return_booking(
            booking.id,
            staff.id,
            ReturnBookingInput {
                return_condition: Some("Good".to_string()),
                damage_assessment: None,
                damage_fee: None,
            },
        )
        .await
        .unwrap();

    // 3 days late at 5.00 per day
    assert_eq!(returned.late_return_fee, Some(dec!(15.00)));
    assert_eq!(returned.return_condition.as_deref(), Some("Good"));
}

#[tokio::test]
async fn members_can_only_cancel_their_own_bookings() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let owner = common::seed_user(&ctx.db, "owner@example.org", UserRole::Whanau).await;
    let other = common::seed_user(&ctx.db, "other@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Projector", 1), staff.id)
        .await
        .unwrap();
    let booking = ctx
        .services
        .bookings
        .create_booking(owner.id, booking_input(item.id, 1, 1, 2))
        .await
        .unwrap();

    let denied = ctx.services.bookings.cancel(booking.id, other.id, false).await;
    assert_matches!(denied, Err(ServiceError::Forbidden(_)));

    let cancelled = ctx
        .services
        .bookings
        .cancel(booking.id, owner.id, false)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled.to_string());
}

#[tokio::test]
async fn cancelling_an_approved_booking_releases_the_reservation() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Gas cooker", 2), staff.id)
        .await
        .unwrap();
    let booking = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 2, 1, 3))
        .await
        .unwrap();
    ctx.services.bookings.approve(booking.id, staff.id).await.unwrap();

    ctx.services
        .bookings
        .cancel(booking.id, staff.id, true)
        .await
        .unwrap();

    let released = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(released.reserved_quantity, 0);
    assert_eq!(released.quantity, 2);
}

#[tokio::test]
async fn declined_bookings_record_the_reason_and_stop_there() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Sound desk", 1), staff.id)
        .await
        .unwrap();
    let booking = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 1, 1, 2))
        .await
        .unwrap();

    let declined = ctx
        .services
        .bookings
        .decline(booking.id, staff.id, Some("Needed for another kaupapa".to_string()))
        .await
        .unwrap();
    assert_eq!(declined.status, BookingStatus::Declined.to_string());
    assert_eq!(declined.notes.as_deref(), Some("Needed for another kaupapa"));

    let checkout = ctx.services.bookings.checkout(booking.id, staff.id).await;
    assert_matches!(checkout, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn booking_rules_guard_quantity_dates_and_loanability() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let mut fixed_asset = common::item_input("Mounted taonga", 1);
    fixed_asset.is_loanable = Some(false);
    let fixed_asset = ctx
        .services
        .inventory
        .create_item(fixed_asset, staff.id)
        .await
        .unwrap();
    let not_loanable = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(fixed_asset.id, 1, 1, 2))
        .await;
    assert_matches!(not_loanable, Err(ServiceError::NotFound(_)));

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Stretchers", 2), staff.id)
        .await
        .unwrap();

    let too_many = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 5, 1, 2))
        .await;
    assert_matches!(too_many, Err(ServiceError::InsufficientStock(_)));

    let backwards = ctx
        .services
        .bookings
        .create_booking(member.id, booking_input(item.id, 1, 3, 1))
        .await;
    assert_matches!(backwards, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn members_only_see_their_own_bookings() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member_a = common::seed_user(&ctx.db, "a@example.org", UserRole::Whanau).await;
    let member_b = common::seed_user(&ctx.db, "b@example.org", UserRole::Whanau).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Tents", 5), staff.id)
        .await
        .unwrap();
    let a_booking = ctx
        .services
        .bookings
        .create_booking(member_a.id, booking_input(item.id, 1, 1, 2))
        .await
        .unwrap();
    ctx.services
        .bookings
        .create_booking(member_b.id, booking_input(item.id, 1, 1, 2))
        .await
        .unwrap();

    let (own, total) = ctx
        .services
        .bookings
        .list_bookings(member_a.id, false, None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(own[0].id, a_booking.id);

    let (_, staff_total) = ctx
        .services
        .bookings
        .list_bookings(staff.id, true, None, 1, 20)
        .await
        .unwrap();
    assert_eq!(staff_total, 2);

    let peek = ctx
        .services
        .bookings
        .get_booking(a_booking.id, member_b.id, false)
        .await;
    assert_matches!(peek, Err(ServiceError::Forbidden(_)));
}
