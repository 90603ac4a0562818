use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inventory item: the cached `quantity` must always equal the signed sum
/// of the item's stock movements.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub category_id: Option<i32>,
    pub barcode: Option<String>,
    #[sea_orm(unique)]
    pub sku: Option<String>,
    pub serial_number: Option<String>,
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub unit: String,
    pub location_id: Option<i32>,
    pub condition_status: String,
    pub purchase_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub purchase_cost: Option<Decimal>,
    pub supplier_id: Option<i32>,
    pub warranty_expiry: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: i32,
    pub max_stock_level: i32,
    pub is_active: bool,
    pub is_loanable: bool,
    pub loan_duration_days: i32,
    /// JSON-encoded list of tag strings
    pub tags: Option<String>,
    pub notes: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub current_value: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::stock_alert::Entity")]
    StockAlerts,
    #[sea_orm(has_many = "super::product_variant::Entity")]
    ProductVariants,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::stock_alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockAlerts.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    New,
    Good,
    Fair,
    Poor,
    Damaged,
    UnderRepair,
}

impl ToString for ConditionStatus {
    fn to_string(&self) -> String {
        match self {
            ConditionStatus::New => "New".to_string(),
            ConditionStatus::Good => "Good".to_string(),
            ConditionStatus::Fair => "Fair".to_string(),
            ConditionStatus::Poor => "Poor".to_string(),
            ConditionStatus::Damaged => "Damaged".to_string(),
            ConditionStatus::UnderRepair => "Under Repair".to_string(),
        }
    }
}

impl FromStr for ConditionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(ConditionStatus::New),
            "Good" => Ok(ConditionStatus::Good),
            "Fair" => Ok(ConditionStatus::Fair),
            "Poor" => Ok(ConditionStatus::Poor),
            "Damaged" => Ok(ConditionStatus::Damaged),
            "Under Repair" => Ok(ConditionStatus::UnderRepair),
            other => Err(format!("Unknown condition status: {}", other)),
        }
    }
}
