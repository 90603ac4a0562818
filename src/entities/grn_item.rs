use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grn_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub grn_id: i32,
    pub purchase_order_item_id: i32,
    pub quantity_received: i32,
    pub condition_status: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goods_received_note::Entity",
        from = "Column::GrnId",
        to = "super::goods_received_note::Column::Id"
    )]
    GoodsReceivedNote,
    #[sea_orm(
        belongs_to = "super::purchase_order_item::Entity",
        from = "Column::PurchaseOrderItemId",
        to = "super::purchase_order_item::Column::Id"
    )]
    PurchaseOrderItem,
}

impl Related<super::goods_received_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoodsReceivedNote.def()
    }
}

impl Related<super::purchase_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
