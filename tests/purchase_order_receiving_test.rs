mod common;

use assert_matches::assert_matches;
use kaiwhakarite_api::{
    entities::{purchase_order::PurchaseOrderStatus, stock_movement::MovementType, user::UserRole},
    errors::ServiceError,
    services::inventory::MovementFilter,
    services::purchase_orders::{
        CreatePurchaseOrderInput, PurchaseOrderLineInput, ReceiptLineInput, ReceiveGoodsInput,
    },
};
use rust_decimal_macros::dec;

fn order_input(supplier_id: i32, lines: Vec<PurchaseOrderLineInput>) -> CreatePurchaseOrderInput {
    CreatePurchaseOrderInput {
        supplier_id,
        expected_delivery_date: None,
        currency: None,
        payment_terms: None,
        delivery_address: None,
        notes: None,
        lines,
    }
}

fn line(item_id: Option<i32>, description: &str, quantity: i32) -> PurchaseOrderLineInput {
    PurchaseOrderLineInput {
        item_id,
        description: description.to_string(),
        quantity,
        unit_price: dec!(4.00),
        tax_rate: None,
    }
}

#[tokio::test]
async fn order_totals_derive_from_the_lines() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let detail = ctx
        .services
        .purchase_orders
        .create_order(
            order_input(
                supplier_id,
                vec![
                    line(None, "Flour 10kg", 10),
                    PurchaseOrderLineInput {
                        item_id: None,
                        description: "Delivery".to_string(),
                        quantity: 1,
                        unit_price: dec!(10.00),
                        tax_rate: Some(dec!(0)),
                    },
                ],
            ),
            staff.id,
        )
        .await
        .unwrap();

    assert_eq!(detail.order.status, PurchaseOrderStatus::Draft.to_string());
    assert!(detail.order.po_number.starts_with("PO-"));
    assert_eq!(detail.order.subtotal, dec!(50.00));
    // 15% GST on the goods line only
    assert_eq!(detail.order.tax_amount, dec!(6.00));
    assert_eq!(detail.order.total_amount, dec!(56.00));
    assert_eq!(detail.order.currency, "NZD");
    assert_eq!(detail.lines.len(), 2);
}

#[tokio::test]
async fn order_creation_writes_a_purchase_audit_entry() {
    use kaiwhakarite_api::entities::audit_log;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let detail = ctx
        .services
        .purchase_orders
        .create_order(order_input(supplier_id, vec![line(None, "Flour", 2)]), staff.id)
        .await
        .unwrap();

    let entries = audit_log::Entity::find()
        .filter(audit_log::Column::Action.eq("PURCHASE"))
        .all(&*ctx.db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].table_name, "purchase_orders");
    assert_eq!(entries[0].record_id, Some(detail.order.id));
    assert_eq!(entries[0].user_id, Some(staff.id));
    let values: serde_json::Value =
        serde_json::from_str(entries[0].new_values.as_deref().expect("new values")).unwrap();
    assert_eq!(values["po_number"], detail.order.po_number);
}

#[tokio::test]
async fn draft_orders_cannot_receive_goods() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let detail = ctx
        .services
        .purchase_orders
        .create_order(order_input(supplier_id, vec![line(None, "Flour", 5)]), staff.id)
        .await
        .unwrap();

    let result = ctx
        .services
        .purchase_orders
        .receive_goods(
            detail.order.id,
            ReceiveGoodsInput {
                notes: None,
                lines: vec![ReceiptLineInput {
                    purchase_order_item_id: detail.lines[0].id,
                    quantity_received: 5,
                    condition_status: None,
                    expiry_date: None,
                    batch_number: None,
                    notes: None,
                }],
            },
            staff.id,
        )
        .await;

    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn partial_receipt_books_stock_and_leaves_the_order_open() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Rice 5kg", 0), staff.id)
        .await
        .unwrap();

    let detail = ctx
        .services
        .purchase_orders
        .create_order(
            order_input(supplier_id, vec![line(Some(item.id), "Rice 5kg", 10)]),
            staff.id,
        )
        .await
        .unwrap();

    let confirmed = ctx
        .services
        .purchase_orders
        .update_status(detail.order.id, PurchaseOrderStatus::Confirmed, staff.id)
        .await
        .unwrap();
    assert_eq!(confirmed.approved_by, Some(staff.id));

    let receipt = ctx
        .services
        .purchase_orders
        .receive_goods(
            detail.order.id,
            ReceiveGoodsInput {
                notes: Some("First pallet".to_string()),
                lines: vec![ReceiptLineInput {
                    purchase_order_item_id: detail.lines[0].id,
                    quantity_received: 4,
                    condition_status: None,
                    expiry_date: None,
                    batch_number: Some("B-001".to_string()),
                    notes: None,
                }],
            },
            staff.id,
        )
        .await
        .unwrap();

    assert_eq!(
        receipt.order_status,
        PurchaseOrderStatus::PartiallyReceived.to_string()
    );
    assert!(receipt.grn.grn_number.starts_with("GRN-"));

    // Stock arrived through the ledger at the order's unit price
    let stocked = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(stocked.quantity, 4);
    assert_eq!(stocked.current_value, Some(dec!(16.00)));

    let (movements, _) = ctx
        .services
        .inventory
        .list_movements(
            MovementFilter {
                item_id: Some(item.id),
                movement_type: Some(MovementType::In),
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].unit_cost, Some(dec!(4.00)));
    assert_eq!(movements[0].reference_type.as_deref(), Some("grn"));
}

#[tokio::test]
async fn full_receipt_completes_the_order() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Tea boxes", 0), staff.id)
        .await
        .unwrap();

    let detail = ctx
        .services
        .purchase_orders
        .create_order(
            order_input(supplier_id, vec![line(Some(item.id), "Tea boxes", 6)]),
            staff.id,
        )
        .await
        .unwrap();
    ctx.services
        .purchase_orders
        .update_status(detail.order.id, PurchaseOrderStatus::Confirmed, staff.id)
        .await
        .unwrap();

    let receive = |quantity: i32| ReceiveGoodsInput {
        notes: None,
        lines: vec![ReceiptLineInput {
            purchase_order_item_id: detail.lines[0].id,
            quantity_received: quantity,
            condition_status: None,
            expiry_date: None,
            batch_number: None,
            notes: None,
        }],
    };

    ctx.services
        .purchase_orders
        .receive_goods(detail.order.id, receive(2), staff.id)
        .await
        .unwrap();
    let final_receipt = ctx
        .services
        .purchase_orders
        .receive_goods(detail.order.id, receive(4), staff.id)
        .await
        .unwrap();

    assert_eq!(
        final_receipt.order_status,
        PurchaseOrderStatus::Received.to_string()
    );

    let completed = ctx
        .services
        .purchase_orders
        .get_order(detail.order.id)
        .await
        .unwrap();
    assert!(completed.order.actual_delivery_date.is_some());
    assert_eq!(completed.lines[0].received_quantity, 6);

    let stocked = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(stocked.quantity, 6);

    let receipts = ctx
        .services
        .purchase_orders
        .list_receipts(detail.order.id)
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);

    // A completed order rejects further receipts and edits
    let extra = ctx
        .services
        .purchase_orders
        .receive_goods(detail.order.id, receive(1), staff.id)
        .await;
    assert_matches!(extra, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn receipt_condition_and_expiry_flow_onto_the_item() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Powdered milk", 0), staff.id)
        .await
        .unwrap();
    let detail = ctx
        .services
        .purchase_orders
        .create_order(
            order_input(supplier_id, vec![line(Some(item.id), "Powdered milk", 3)]),
            staff.id,
        )
        .await
        .unwrap();
    ctx.services
        .purchase_orders
        .update_status(detail.order.id, PurchaseOrderStatus::Confirmed, staff.id)
        .await
        .unwrap();

    let expiry = chrono::Utc::now().date_naive() + chrono::Duration::days(180);
    ctx.services
        .purchase_orders
        .receive_goods(
            detail.order.id,
            ReceiveGoodsInput {
                notes: None,
                lines: vec![ReceiptLineInput {
                    purchase_order_item_id: detail.lines[0].id,
                    quantity_received: 3,
                    condition_status: Some("New".to_string()),
                    expiry_date: Some(expiry),
                    batch_number: None,
                    notes: None,
                }],
            },
            staff.id,
        )
        .await
        .unwrap();

    let refreshed = ctx.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(refreshed.condition_status, "New");
    assert_eq!(refreshed.expiry_date, Some(expiry));
}

#[tokio::test]
async fn inactive_suppliers_cannot_take_orders() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Closed Down Ltd").await;
    ctx.services
        .suppliers
        .deactivate_supplier(supplier_id)
        .await
        .unwrap();

    let result = ctx
        .services
        .purchase_orders
        .create_order(order_input(supplier_id, vec![line(None, "Flour", 1)]), staff.id)
        .await;

    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn supplier_performance_counts_completed_orders() {
    let ctx = common::setup().await;
    let staff = common::seed_user(&ctx.db, "manager@example.org", UserRole::Manager).await;
    let supplier_id = common::seed_supplier(&ctx, "Kai Supplies Ltd").await;

    let item = ctx
        .services
        .inventory
        .create_item(common::item_input("Oats", 0), staff.id)
        .await
        .unwrap();
    let detail = ctx
        .services
        .purchase_orders
        .create_order(
            order_input(supplier_id, vec![line(Some(item.id), "Oats", 2)]),
            staff.id,
        )
        .await
        .unwrap();
    ctx.services
        .purchase_orders
        .update_status(detail.order.id, PurchaseOrderStatus::Confirmed, staff.id)
        .await
        .unwrap();
    ctx.services
        .purchase_orders
        .receive_goods(
            detail.order.id,
            ReceiveGoodsInput {
                notes: None,
                lines: vec![ReceiptLineInput {
                    purchase_order_item_id: detail.lines[0].id,
                    quantity_received: 2,
                    condition_status: None,
                    expiry_date: None,
                    batch_number: None,
                    notes: None,
                }],
            },
            staff.id,
        )
        .await
        .unwrap();

    let performance = ctx.services.suppliers.performance(supplier_id).await.unwrap();
    assert_eq!(performance.total_orders, 1);
    assert_eq!(performance.completed_orders, 1);
    assert_eq!(performance.total_spend, dec!(9.20));
}
