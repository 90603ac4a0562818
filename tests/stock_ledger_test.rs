mod common;

use assert_matches::assert_matches;
use kaiwhakarite_api::{
    entities::{stock_movement::MovementType, user::UserRole},
    errors::ServiceError,
    services::inventory::{MovementFilter, MovementInput},
};
use rust_decimal_macros::dec;

fn movement(item_id: i32, movement_type: MovementType, quantity: i32) -> MovementInput {
    MovementInput {
        item_id,
        movement_type,
        quantity,
        unit_cost: None,
        from_location_id: None,
        to_location_id: None,
        reference_id: None,
        reference_type: None,
        user_id: Some(1),
        reason: None,
        notes: None,
    }
}

#[tokio::test]
async fn opening_balance_starts_the_ledger() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;

    let mut input = common::item_input("Gazebo", 4);
    input.purchase_cost = Some(dec!(120.00));
    let item = ctx
        .services
        .inventory
        .create_item(input, staff.id)
        .await
        .unwrap();

    assert_eq!(item.quantity, 4);

    let (movements, total) = ctx
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(item.id),
                movement_type: None,
            },
            1,
            20,
        )
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(movements[0].movement_type, MovementType::In.to_string());
    assert_eq!(movements[0].quantity, 4);
    assert_eq!(movements[0].reference_type.as_deref(), Some("initial_stock"));
    assert_eq!(movements[0].unit_cost, Some(dec!(120.00)));
    assert_eq!(movements[0].total_cost, Some(dec!(480.00)));
}

#[tokio::test]
async fn out_movement_reduces_the_cached_quantity() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Chairs", 10), staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .record_movement(movement(item.id, MovementType::Out, 3))
        .await
        .unwrap();

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 7);
}

#[tokio::test]
async fn out_movement_cannot_overdraw_stock() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Urn", 2), staff.id)
        .await
        .unwrap();

    let result = ctx
        .services
        .inventory
        .record_movement(movement(item.id, MovementType::Out, 5))
        .await;

    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    // A failed movement must leave no ledger entry behind
    let (_, total) = ctx
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(item.id),
                movement_type: Some(MovementType::Out),
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(total, 0);

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 2);
}

#[tokio::test]
async fn adjustment_carries_a_signed_delta() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Blankets", 8), staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .record_movement(movement(item.id, MovementType::Adjustment, -3))
        .await
        .unwrap();

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 5);

    let zero = ctx
        .services
        .inventory
        .record_movement(movement(item.id, MovementType::Adjustment, 0))
        .await;
    assert_matches!(zero, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn transfer_relocates_without_changing_quantity() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let shed = common::seed_location(&ctx, "Shed").await;
    let wharenui = common::seed_location(&ctx, "Wharenui").await;

    let mut input = common::item_input("Tables", 6);
    input.location_id = Some(shed);
    let item = ctx
        .services
        .inventory
        .create_item(input, staff.id)
        .await
        .unwrap();

    let mut transfer = movement(item.id, MovementType::Transfer, 6);
    transfer.from_location_id = Some(shed);
    transfer.to_location_id = Some(wharenui);
    ctx.services
        .inventory
        .record_movement(transfer)
        .await
        .unwrap();

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 6);
    assert_eq!(refreshed.location_id, Some(wharenui));

    // Destination is mandatory for transfers
    let missing_destination = ctx
        .services
        .inventory
        .record_movement(movement(item.id, MovementType::Transfer, 2))
        .await;
    assert_matches!(missing_destination, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn transfer_cannot_exceed_on_hand_stock() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let shed = common::seed_location(&ctx, "Shed").await;
    let wharenui = common::seed_location(&ctx, "Wharenui").await;

    let mut input = common::item_input("Speakers", 3);
    input.location_id = Some(shed);
    let item = ctx
        .services
        .inventory
        .create_item(input, staff.id)
        .await
        .unwrap();

    let mut transfer = movement(item.id, MovementType::Transfer, 100);
    transfer.from_location_id = Some(shed);
    transfer.to_location_id = Some(wharenui);
    let result = ctx.services.inventory.record_movement(transfer).await;
    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    // Nothing moved and nothing was written
    let (_, total) = ctx
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(item.id),
                movement_type: Some(MovementType::Transfer),
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(total, 0);

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 3);
    assert_eq!(refreshed.location_id, Some(shed));
}

#[tokio::test]
async fn update_with_quantity_writes_an_adjustment() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Hangi baskets", 5), staff.id)
        .await
        .unwrap();

    let updated = ctx
        .services
        .inventory
        .update_item(
            item.id,
            kaiwhakarite_api::services::inventory::UpdateItemInput {
                quantity: Some(9),
                ..Default::default()
            },
            staff.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.quantity, 9);

    let (movements, _) = ctx
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(item.id),
                movement_type: Some(MovementType::Adjustment),
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity, 4);
    assert_eq!(movements[0].reference_type.as_deref(), Some("item_update"));
}

#[tokio::test]
async fn item_changes_leave_an_audit_trail() {
    use kaiwhakarite_api::entities::audit_log;
    use sea_orm::EntityTrait;

    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Generators", 1), staff.id)
        .await
        .unwrap();
    ctx.services.inventory.deactivate_item(item.id).await.unwrap();

    let entries = audit_log::Entity::find().all(&*ctx.db).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "CREATE");
    assert_eq!(entries[0].table_name, "inventory_items");
    assert_eq!(entries[0].record_id, Some(item.id));
    assert_eq!(entries[0].user_id, Some(staff.id));
    assert!(entries[0].new_values.is_some());
    assert_eq!(entries[1].action, "DEACTIVATE");
    assert!(entries[1].old_values.is_some());
}

#[tokio::test]
async fn movements_against_unknown_items_are_rejected() {
    let ctx = common::setup().await;

    let result = ctx
        .services
        .inventory
        .record_movement(movement(999, MovementType::In, 1))
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
