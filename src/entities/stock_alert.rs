use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stock alert. Only explicit acknowledgement closes an alert; the engine
/// never deactivates one on its own.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub alert_type: String,
    pub threshold_value: Option<i32>,
    pub current_value: Option<i32>,
    pub message: String,
    pub is_active: bool,
    pub acknowledged_by: Option<i32>,
    pub acknowledged_at: Option<DateTime<Utc>>,
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
        from = "Column::AcknowledgedBy",
        to = "super::user::Column::Id"
    )]
    AcknowledgedByUser,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    LowStock,
    OutOfStock,
    ExpiryWarning,
    Overstock,
}

impl ToString for AlertType {
    fn to_string(&self) -> String {
        match self {
            AlertType::LowStock => "LOW_STOCK".to_string(),
            AlertType::OutOfStock => "OUT_OF_STOCK".to_string(),
            AlertType::ExpiryWarning => "EXPIRY_WARNING".to_string(),
            AlertType::Overstock => "OVERSTOCK".to_string(),
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW_STOCK" => Ok(AlertType::LowStock),
            "OUT_OF_STOCK" => Ok(AlertType::OutOfStock),
            "EXPIRY_WARNING" => Ok(AlertType::ExpiryWarning),
            "OVERSTOCK" => Ok(AlertType::Overstock),
            other => Err(format!("Unknown alert type: {}", other)),
        }
    }
}
