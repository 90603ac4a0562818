use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Append-only stock ledger entry. Rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub movement_type: String,
    /// Positive for every type except ADJUSTMENT, which carries the signed delta
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_cost: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_cost: Option<Decimal>,
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub reference_id: Option<i32>,
    pub reference_type: Option<String>,
    pub user_id: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    In,
    Out,
    Transfer,
    Adjustment,
    Return,
}

impl MovementType {
    /// Signed effect of a movement of `quantity` on the cached item quantity.
    /// TRANSFER relocates without changing the on-hand count.
    pub fn quantity_delta(&self, quantity: i32) -> i32 {
        match self {
            MovementType::In | MovementType::Return => quantity,
            MovementType::Out => -quantity,
            MovementType::Adjustment => quantity,
            MovementType::Transfer => 0,
        }
    }
}

impl ToString for MovementType {
    fn to_string(&self) -> String {
        match self {
            MovementType::In => "IN".to_string(),
            MovementType::Out => "OUT".to_string(),
            MovementType::Transfer => "TRANSFER".to_string(),
            MovementType::Adjustment => "ADJUSTMENT".to_string(),
            MovementType::Return => "RETURN".to_string(),
        }
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(MovementType::In),
            "OUT" => Ok(MovementType::Out),
            "TRANSFER" => Ok(MovementType::Transfer),
            "ADJUSTMENT" => Ok(MovementType::Adjustment),
            "RETURN" => Ok(MovementType::Return),
            other => Err(format!("Unknown movement type: {}", other)),
        }
    }
}
