mod common;

use common::TestContext;
use kaiwhakarite_api::{
    entities::{inventory_valuation::ValuationMethod, stock_movement::MovementType, user::UserRole},
    services::inventory::MovementInput,
};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn costed_in(item_id: i32, quantity: i32, unit_cost: Decimal) -> MovementInput {
    MovementInput {
        item_id,
        movement_type: MovementType::In,
        quantity,
        unit_cost: Some(unit_cost),
        from_location_id: None,
        to_location_id: None,
        reference_id: None,
        reference_type: Some("grn".to_string()),
        user_id: Some(1),
        reason: None,
        notes: None,
    }
}

/// Receives 10 @ 5.00 then 5 @ 8.00 and issues 7, leaving 8 on hand.
async fn seed_layered_item(ctx: &TestContext) -> i32 {
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Flour", 0), staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .record_movement(costed_in(item.id, 10, dec!(5.00)))
        .await
        .unwrap();
    ctx.services
        .inventory
        .record_movement(costed_in(item.id, 5, dec!(8.00)))
        .await
        .unwrap();
    ctx.services
        .inventory
        .record_movement(MovementInput {
            movement_type: MovementType::Out,
            unit_cost: None,
            reference_type: None,
            ..costed_in(item.id, 7, dec!(0))
        })
        .await
        .unwrap();

    item.id
}

#[rstest]
#[case(ValuationMethod::Fifo, dec!(5.00), dec!(40.00))]
#[case(ValuationMethod::Lifo, dec!(6.875), dec!(55.00))]
#[case(ValuationMethod::Average, dec!(6.00), dec!(48.00))]
#[case(ValuationMethod::Specific, dec!(6.00), dec!(48.00))]
#[tokio::test]
async fn valuation_methods_price_the_same_layers_differently(
    #[case] method: ValuationMethod,
    #[case] expected_cost: Decimal,
    #[case] expected_total: Decimal,
) {
    let ctx = common::setup().await;
    let item_id = seed_layered_item(&ctx).await;

    let result = ctx
        .services
        .valuation
        .value_item(item_id, method, None)
        .await
        .unwrap()
        .expect("valuation result");

    assert_eq!(result.quantity, 8);
    assert_eq!(result.cost_per_unit, expected_cost);
    assert_eq!(result.total_value, expected_total);
}

/// Stock that arrived without a cost still counts in the divisor: 6
/// donated units plus 4 @ 5.00 leave 10 on hand worth 20.00 in total.
#[rstest]
#[case(ValuationMethod::Fifo)]
#[case(ValuationMethod::Lifo)]
#[tokio::test]
async fn uncosted_units_dilute_the_layered_cost(#[case] method: ValuationMethod) {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Kete", 6), staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .record_movement(costed_in(item.id, 4, dec!(5.00)))
        .await
        .unwrap();

    let result = ctx
        .services
        .valuation
        .value_item(item.id, method, None)
        .await
        .unwrap()
        .expect("valuation result");

    assert_eq!(result.quantity, 10);
    assert_eq!(result.cost_per_unit, dec!(2.00));
    assert_eq!(result.total_value, dec!(20.00));
}

#[tokio::test]
async fn costed_receipt_refreshes_the_cached_average_value() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Rice", 0), staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .record_movement(costed_in(item.id, 10, dec!(5.00)))
        .await
        .unwrap();
    ctx.services
        .inventory
        .record_movement(costed_in(item.id, 5, dec!(8.00)))
        .await
        .unwrap();

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.quantity, 15);
    assert_eq!(refreshed.current_value, Some(dec!(90.00)));
}

#[tokio::test]
async fn empty_stock_has_no_valuation() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Sugar", 0), staff.id)
        .await
        .unwrap();

    let result = ctx
        .services
        .valuation
        .value_item(item.id, ValuationMethod::Fifo, None)
        .await
        .unwrap();
    assert!(result.is_none());

    let history = ctx
        .services
        .valuation
        .valuation_history(item.id)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn uncosted_stock_has_no_valuation() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    // Opening balance without a purchase cost: an uncosted IN
    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Donated blankets", 12), staff.id)
        .await
        .unwrap();

    let result = ctx
        .services
        .valuation
        .value_item(item.id, ValuationMethod::Average, None)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn whole_inventory_report_totals_each_line() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;

    let mut costed = common::item_input("Tea", 10);
    costed.purchase_cost = Some(dec!(3.50));
    let costed = ctx
        .services
        .inventory
        .create_item(costed, staff.id)
        .await
        .unwrap();

    // Uncosted item is skipped, not counted as zero
    ctx.services
        .inventory
        .create_item(common::item_input("Koha goods", 4), staff.id)
        .await
        .unwrap();

    let report = ctx
        .services
        .valuation
        .value_inventory(ValuationMethod::Fifo, None)
        .await
        .unwrap();

    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].item_id, costed.id);
    assert_eq!(report.total_value, dec!(35.00));
}

#[tokio::test]
async fn valuation_snapshots_accumulate_as_history() {
    let ctx = common::setup().await;
    let item_id = seed_layered_item(&ctx).await;

    // Two automatic AVERAGE snapshots already exist from the costed INs
    let before = ctx
        .services
        .valuation
        .valuation_history(item_id)
        .await
        .unwrap()
        .len();
    assert_eq!(before, 2);

    ctx.services
        .valuation
        .value_item(item_id, ValuationMethod::Fifo, None)
        .await
        .unwrap();

    let after = ctx
        .services
        .valuation
        .valuation_history(item_id)
        .await
        .unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0].valuation_method, ValuationMethod::Fifo.to_string());
}
