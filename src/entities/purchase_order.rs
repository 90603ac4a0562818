use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub po_number: String,
    pub supplier_id: i32,
    pub status: String,
    pub order_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_terms: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub created_by: i32,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::purchase_order_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::goods_received_note::Entity")]
    GoodsReceivedNotes,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::purchase_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::goods_received_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoodsReceivedNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    Confirmed,
    PartiallyReceived,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Terminal orders reject further edits and receiving.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Received | PurchaseOrderStatus::Cancelled
        )
    }

    /// Goods can be received once the supplier has confirmed, and again
    /// while a previous receipt left the order incomplete.
    pub fn can_receive(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Confirmed | PurchaseOrderStatus::PartiallyReceived
        )
    }
}

impl ToString for PurchaseOrderStatus {
    fn to_string(&self) -> String {
        match self {
            PurchaseOrderStatus::Draft => "DRAFT".to_string(),
            PurchaseOrderStatus::Sent => "SENT".to_string(),
            PurchaseOrderStatus::Confirmed => "CONFIRMED".to_string(),
            PurchaseOrderStatus::PartiallyReceived => "PARTIALLY_RECEIVED".to_string(),
            PurchaseOrderStatus::Received => "RECEIVED".to_string(),
            PurchaseOrderStatus::Cancelled => "CANCELLED".to_string(),
        }
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(PurchaseOrderStatus::Draft),
            "SENT" => Ok(PurchaseOrderStatus::Sent),
            "CONFIRMED" => Ok(PurchaseOrderStatus::Confirmed),
            "PARTIALLY_RECEIVED" => Ok(PurchaseOrderStatus::PartiallyReceived),
            "RECEIVED" => Ok(PurchaseOrderStatus::Received),
            "CANCELLED" => Ok(PurchaseOrderStatus::Cancelled),
            other => Err(format!("Unknown purchase order status: {}", other)),
        }
    }
}
