pub mod audit_log;
pub mod booking;
pub mod category;
pub mod goods_received_note;
pub mod grn_item;
pub mod inventory_item;
pub mod inventory_valuation;
pub mod location;
pub mod product_variant;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod stock_alert;
pub mod stock_movement;
pub mod stock_transfer;
pub mod supplier;
pub mod user;
