pub mod alerts;
pub(crate) mod audit;
pub mod bookings;
pub mod inventory;
pub mod lookups;
pub mod purchase_orders;
pub mod reports;
pub mod suppliers;
pub mod transfers;
pub mod valuation;

pub use alerts::AlertService;
pub use bookings::BookingService;
pub use inventory::InventoryService;
pub use lookups::LookupService;
pub use purchase_orders::PurchaseOrderService;
pub use reports::ReportsService;
pub use suppliers::SupplierService;
pub use transfers::TransferService;
pub use valuation::ValuationService;
