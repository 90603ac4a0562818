mod common;

use kaiwhakarite_api::{
    entities::user::UserRole,
    services::lookups::CreateCategoryInput,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn inventory_summary_breaks_down_by_category() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;

    let kai = ctx
        .services
        .lookups
        .create_category(CreateCategoryInput {
            name_en: "Food".to_string(),
            name_mi: Some("Kai".to_string()),
            description_en: None,
            description_mi: None,
        })
        .await
        .unwrap();

    let mut flour = common::item_input("Flour", 10);
    flour.category_id = Some(kai.id);
    flour.purchase_cost = Some(dec!(5.00));
    flour.reorder_level = Some(20);
    ctx.services
        .inventory
        .create_item(flour, staff.id)
        .await
        .unwrap();

    ctx.services
        .inventory
        .create_item(common::item_input("Spare parts", 0), staff.id)
        .await
        .unwrap();

    let summary = ctx.services.reports.inventory_summary().await.unwrap();

    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_quantity, 10);
    assert_eq!(summary.total_value, dec!(50.00));
    assert_eq!(summary.low_stock_items, 1);
    assert_eq!(summary.out_of_stock_items, 1);

    assert_eq!(summary.by_category.len(), 2);
    let food = summary
        .by_category
        .iter()
        .find(|c| c.category_id == Some(kai.id))
        .expect("food category");
    assert_eq!(food.category_name_en, "Food");
    assert_eq!(food.category_name_mi.as_deref(), Some("Kai"));
    assert_eq!(food.item_count, 1);
    assert_eq!(food.total_quantity, 10);

    let uncategorised = summary
        .by_category
        .iter()
        .find(|c| c.category_id.is_none())
        .expect("uncategorised bucket");
    assert_eq!(uncategorised.category_name_en, "Uncategorised");
}

#[tokio::test]
async fn dashboard_counts_reflect_activity() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;
    let member = common::seed_user(&ctx.db, "whanau@example.org", UserRole::Whanau).await;

    let mut low = common::item_input("Cups", 2);
    low.reorder_level = Some(5);
    let item = ctx
        .services
        .inventory
        .create_item(low, staff.id)
        .await
        .unwrap();

    let today = chrono::Utc::now().date_naive();
    ctx.services
        .bookings
        .create_booking(
            member.id,
            kaiwhakarite_api::services::bookings::CreateBookingInput {
                item_id: item.id,
                kaupapa_name: "Hui".to_string(),
                kaupapa_description: None,
                whanau_group: None,
                quantity_requested: 1,
                start_date: today,
                end_date: today + chrono::Duration::days(2),
                notes: None,
            },
        )
        .await
        .unwrap();

    let stats = ctx.services.reports.dashboard_stats().await.unwrap();

    assert_eq!(stats.active_items, 1);
    assert_eq!(stats.pending_bookings, 1);
    assert_eq!(stats.active_bookings, 0);
    assert_eq!(stats.open_alerts, 1);
    assert_eq!(stats.orders_awaiting_receipt, 0);
    // The opening balance movement landed this week
    assert_eq!(stats.movements_last_seven_days, 1);
}

#[tokio::test]
async fn recent_movements_honour_the_limit() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "kaimahi@example.org", UserRole::Kaimahi).await;

    for name in ["One", "Two", "Three"] {
        ctx.services
            .inventory
            .create_item(common::item_input(name, 1), staff.id)
            .await
            .unwrap();
    }

    let movements = ctx.services.reports.recent_movements(2).await.unwrap();
    assert_eq!(movements.len(), 2);
}
