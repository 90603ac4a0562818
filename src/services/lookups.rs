use crate::{
    entities::{
        category::{self, Entity as Category},
        location::{self, Entity as Location},
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateLocationInput {
    pub name_en: String,
    pub name_mi: Option<String>,
    pub description_en: Option<String>,
    pub description_mi: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub is_main_warehouse: Option<bool>,
}

/// Bilingual reference data: categories and storage locations.
#[derive(Clone)]
pub struct LookupService {
    db_pool: Arc<DatabaseConnection>,
}

impl LookupService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let created = category::ActiveModel {
            name_en: Set(input.name_en),
            name_mi: Set(input.name_mi),
            description_en: Set(input.description_en),
            description_mi: Set(input.description_mi),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        active_only: bool,
    ) -> Result<Vec<category::Model>, ServiceError> {
        let mut query = Category::find();
        if active_only {
            query = query.filter(category::Column::IsActive.eq(true));
        }
        let categories = query
            .order_by_asc(category::Column::NameEn)
            .all(&*self.db_pool)
            .await?;
        Ok(categories)
    }

    #[instrument(skip(self, input))]
    pub async fn create_location(
        &self,
        input: CreateLocationInput,
    ) -> Result<location::Model, ServiceError> {
        let created = location::ActiveModel {
            name_en: Set(input.name_en),
            name_mi: Set(input.name_mi),
            description_en: Set(input.description_en),
            description_mi: Set(input.description_mi),
            address: Set(input.address),
            contact_person: Set(input.contact_person),
            contact_phone: Set(input.contact_phone),
            is_main_warehouse: Set(input.is_main_warehouse.unwrap_or(false)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        active_only: bool,
    ) -> Result<Vec<location::Model>, ServiceError> {
        let mut query = Location::find();
        if active_only {
            query = query.filter(location::Column::IsActive.eq(true));
        }
        let locations = query
            .order_by_asc(location::Column::NameEn)
            .all(&*self.db_pool)
            .await?;
        Ok(locations)
    }
}
