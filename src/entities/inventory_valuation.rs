use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Point-in-time valuation snapshot for one item.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_valuations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub valuation_method: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cost_per_unit: Decimal,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_value: Decimal,
    pub valuation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::ItemId",
        to = "super::inventory_item::Column::Id"
    )]
    InventoryItem,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationMethod {
    Fifo,
    Lifo,
    Average,
    /// Accepted for compatibility; computed as a weighted average
    Specific,
}

impl ToString for ValuationMethod {
    fn to_string(&self) -> String {
        match self {
            ValuationMethod::Fifo => "FIFO".to_string(),
            ValuationMethod::Lifo => "LIFO".to_string(),
            ValuationMethod::Average => "AVERAGE".to_string(),
            ValuationMethod::Specific => "SPECIFIC".to_string(),
        }
    }
}

impl FromStr for ValuationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FIFO" => Ok(ValuationMethod::Fifo),
            "LIFO" => Ok(ValuationMethod::Lifo),
            "AVERAGE" => Ok(ValuationMethod::Average),
            "SPECIFIC" => Ok(ValuationMethod::Specific),
            other => Err(format!("Unknown valuation method: {}", other)),
        }
    }
}
