mod common;

use assert_matches::assert_matches;
use kaiwhakarite_api::{
    entities::{stock_transfer::TransferStatus, user::UserRole},
    errors::ServiceError,
    services::transfers::CreateTransferInput,
};

fn transfer_input(item_id: i32, from: i32, to: i32, quantity: i32) -> CreateTransferInput {
    CreateTransferInput {
        item_id,
        from_location_id: from,
        to_location_id: to,
        quantity,
        reason: Some("Wānanga at the other site".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn completed_transfer_relocates_the_item() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let shed = common::seed_location(&ctx, "Shed").await;
    let kura = common::seed_location(&ctx, "Kura").await;

    let mut input = common::item_input("Whiteboards", 4);
    input.location_id = Some(shed);
    let item = ctx
        .services
        .inventory
        .create_item(input, staff.id)
        .await
        .unwrap();

    let transfer = ctx
        .services
        .transfers
        .request_transfer(transfer_input(item.id, shed, kura, 4), staff.id)
        .await
        .unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending.to_string());
    assert!(transfer.transfer_number.starts_with("TR-"));

    // Stock stays put until completion
    let parked = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(parked.location_id, Some(shed));

    ctx.services.transfers.approve(transfer.id, staff.id).await.unwrap();
    let completed = ctx
        .services
        .transfers
        .complete(transfer.id, staff.id)
        .await
        .unwrap();
    assert_eq!(completed.status, TransferStatus::Completed.to_string());
    assert!(completed.completed_at.is_some());

    let moved = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(moved.location_id, Some(kura));
    assert_eq!(moved.quantity, 4);
}

#[tokio::test]
async fn transfers_must_be_approved_before_completion() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let shed = common::seed_location(&ctx, "Shed").await;
    let kura = common::seed_location(&ctx, "Kura").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Easels", 2), staff.id)
        .await
        .unwrap();
    let transfer = ctx
        .services
        .transfers
        .request_transfer(transfer_input(item.id, shed, kura, 2), staff.id)
        .await
        .unwrap();

    let early = ctx.services.transfers.complete(transfer.id, staff.id).await;
    assert_matches!(early, Err(ServiceError::InvalidOperation(_)));

    let cancelled = ctx.services.transfers.cancel(transfer.id).await.unwrap();
    assert_eq!(cancelled.status, TransferStatus::Cancelled.to_string());

    let too_late = ctx.services.transfers.approve(transfer.id, staff.id).await;
    assert_matches!(too_late, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn transfer_requests_validate_locations_and_stock() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let shed = common::seed_location(&ctx, "Shed").await;
    let kura = common::seed_location(&ctx, "Kura").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Heaters", 3), staff.id)
        .await
        .unwrap();

    let same_place = ctx
        .services
        .transfers
        .request_transfer(transfer_input(item.id, shed, shed, 1), staff.id)
        .await;
    assert_matches!(same_place, Err(ServiceError::ValidationError(_)));

    let too_many = ctx
        .services
        .transfers
        .request_transfer(transfer_input(item.id, shed, kura, 9), staff.id)
        .await;
    assert_matches!(too_many, Err(ServiceError::InsufficientStock(_)));

    let nowhere = ctx
        .services
        .transfers
        .request_transfer(transfer_input(item.id, shed, 999, 1), staff.id)
        .await;
    assert_matches!(nowhere, Err(ServiceError::NotFound(_)));
}
