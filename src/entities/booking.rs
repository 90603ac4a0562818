use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub user_id: i32,
    /// Purpose / event the resources are borrowed for
    pub kaupapa_name: String,
    pub kaupapa_description: Option<String>,
    pub whanau_group: Option<String>,
    pub quantity_requested: i32,
    pub booking_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub return_condition: Option<String>,
    pub damage_assessment: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub late_return_fee: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub damage_fee: Option<Decimal>,
    pub notes: Option<String>,
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
pub enum BookingStatus {
    Pending,
    Approved,
    Declined,
    Active,
    Returned,
    Overdue,
    Cancelled,
}

impl ToString for BookingStatus {
    fn to_string(&self) -> String {
        match self {
            BookingStatus::Pending => "Pending".to_string(),
            BookingStatus::Approved => "Approved".to_string(),
            BookingStatus::Declined => "Declined".to_string(),
            BookingStatus::Active => "Active".to_string(),
            BookingStatus::Returned => "Returned".to_string(),
            BookingStatus::Overdue => "Overdue".to_string(),
            BookingStatus::Cancelled => "Cancelled".to_string(),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Approved" => Ok(BookingStatus::Approved),
            "Declined" => Ok(BookingStatus::Declined),
            "Active" => Ok(BookingStatus::Active),
            "Returned" => Ok(BookingStatus::Returned),
            "Overdue" => Ok(BookingStatus::Overdue),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}
