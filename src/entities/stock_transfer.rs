use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub transfer_number: String,
    pub item_id: i32,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub quantity: i32,
    pub status: String,
    pub requested_by: i32,
    pub approved_by: Option<i32>,
    pub received_by: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
pub enum TransferStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl ToString for TransferStatus {
    fn to_string(&self) -> String {
        match self {
            TransferStatus::Pending => "PENDING".to_string(),
            TransferStatus::Approved => "APPROVED".to_string(),
            TransferStatus::Completed => "COMPLETED".to_string(),
            TransferStatus::Cancelled => "CANCELLED".to_string(),
        }
    }
}

impl FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransferStatus::Pending),
            "APPROVED" => Ok(TransferStatus::Approved),
            "COMPLETED" => Ok(TransferStatus::Completed),
            "CANCELLED" => Ok(TransferStatus::Cancelled),
            other => Err(format!("Unknown transfer status: {}", other)),
        }
    }
}
