pub mod alerts;
pub mod bookings;
pub mod common;
pub mod inventory;
pub mod lookups;
pub mod purchase_orders;
pub mod reports;
pub mod suppliers;
pub mod transfers;
pub mod valuation;

pub use alerts::alert_routes;
pub use bookings::booking_routes;
pub use inventory::{item_routes, movement_routes};
pub use lookups::{category_routes, location_routes};
pub use purchase_orders::purchase_order_routes;
pub use reports::report_routes;
pub use suppliers::supplier_routes;
pub use transfers::transfer_routes;
pub use valuation::valuation_routes;
