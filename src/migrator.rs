use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_locations_table::Migration),
            Box::new(m20240101_000004_create_suppliers_table::Migration),
            Box::new(m20240101_000005_create_inventory_items_table::Migration),
            Box::new(m20240101_000006_create_product_variants_table::Migration),
            Box::new(m20240101_000007_create_stock_movements_table::Migration),
            Box::new(m20240101_000008_create_stock_alerts_table::Migration),
            Box::new(m20240101_000009_create_inventory_valuations_table::Migration),
            Box::new(m20240101_000010_create_bookings_table::Migration),
            Box::new(m20240101_000011_create_stock_transfers_table::Migration),
            Box::new(m20240101_000012_create_purchasing_tables::Migration),
            Box::new(m20240101_000013_create_grn_tables::Migration),
            Box::new(m20240101_000014_create_audit_log_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FirstName).string().not_null())
                        .col(ColumnDef::new(Users::LastName).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("Whānau"),
                        )
                        .col(
                            ColumnDef::new(Users::Status)
                                .string()
                                .not_null()
                                .default("Active"),
                        )
                        .col(ColumnDef::new(Users::WhanauGroup).string().null())
                        .col(ColumnDef::new(Users::Marae).string().null())
                        .col(
                            ColumnDef::new(Users::LanguagePreference)
                                .string()
                                .not_null()
                                .default("en"),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        FirstName,
        LastName,
        Role,
        Status,
        WhanauGroup,
        Marae,
        LanguagePreference,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_categories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::NameEn).string().not_null())
                        .col(ColumnDef::new(Categories::NameMi).string().null())
                        .col(ColumnDef::new(Categories::DescriptionEn).string().null())
                        .col(ColumnDef::new(Categories::DescriptionMi).string().null())
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Categories::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        NameEn,
        NameMi,
        DescriptionEn,
        DescriptionMi,
        IsActive,
        CreatedAt,
    }
}

mod m20240101_000003_create_locations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::NameEn).string().not_null())
                        .col(ColumnDef::new(Locations::NameMi).string().null())
                        .col(ColumnDef::new(Locations::DescriptionEn).string().null())
                        .col(ColumnDef::new(Locations::DescriptionMi).string().null())
                        .col(ColumnDef::new(Locations::Address).string().null())
                        .col(ColumnDef::new(Locations::ContactPerson).string().null())
                        .col(ColumnDef::new(Locations::ContactPhone).string().null())
                        .col(
                            ColumnDef::new(Locations::IsMainWarehouse)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Locations::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Locations::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
        NameEn,
        NameMi,
        DescriptionEn,
        DescriptionMi,
        Address,
        ContactPerson,
        ContactPhone,
        IsMainWarehouse,
        IsActive,
        CreatedAt,
    }
}

mod m20240101_000004_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::Website).string().null())
                        .col(ColumnDef::new(Suppliers::TaxNumber).string().null())
                        .col(
                            ColumnDef::new(Suppliers::PaymentTerms)
                                .string()
                                .not_null()
                                .default("Net 30"),
                        )
                        .col(
                            ColumnDef::new(Suppliers::Currency)
                                .string()
                                .not_null()
                                .default("NZD"),
                        )
                        .col(ColumnDef::new(Suppliers::Rating).integer().null())
                        .col(
                            ColumnDef::new(Suppliers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::Notes).string().null())
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        ContactPerson,
        Email,
        Phone,
        Address,
        Website,
        TaxNumber,
        PaymentTerms,
        Currency,
        Rating,
        IsActive,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::NameEn).string().not_null())
                        .col(ColumnDef::new(InventoryItems::NameMi).string().null())
                        .col(ColumnDef::new(InventoryItems::DescriptionEn).string().null())
                        .col(ColumnDef::new(InventoryItems::DescriptionMi).string().null())
                        .col(ColumnDef::new(InventoryItems::CategoryId).integer().null())
                        .col(ColumnDef::new(InventoryItems::Barcode).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::Sku)
                                .string()
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::SerialNumber).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReservedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Unit)
                                .string()
                                .not_null()
                                .default("pieces"),
                        )
                        .col(ColumnDef::new(InventoryItems::LocationId).integer().null())
                        .col(
                            ColumnDef::new(InventoryItems::ConditionStatus)
                                .string()
                                .not_null()
                                .default("Good"),
                        )
                        .col(ColumnDef::new(InventoryItems::PurchaseDate).date().null())
                        .col(
                            ColumnDef::new(InventoryItems::PurchaseCost)
                                .decimal()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryItems::SupplierId).integer().null())
                        .col(ColumnDef::new(InventoryItems::WarrantyExpiry).date().null())
                        .col(ColumnDef::new(InventoryItems::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(InventoryItems::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::MaxStockLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::IsLoanable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::LoanDurationDays)
                                .integer()
                                .not_null()
                                .default(7),
                        )
                        .col(ColumnDef::new(InventoryItems::Tags).string().null())
                        .col(ColumnDef::new(InventoryItems::Notes).string().null())
                        .col(ColumnDef::new(InventoryItems::Weight).double().null())
                        .col(ColumnDef::new(InventoryItems::Dimensions).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::CurrentValue)
                                .decimal()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_location_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::LocationId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_barcode")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Barcode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        NameEn,
        NameMi,
        DescriptionEn,
        DescriptionMi,
        CategoryId,
        Barcode,
        Sku,
        SerialNumber,
        Quantity,
        ReservedQuantity,
        Unit,
        LocationId,
        ConditionStatus,
        PurchaseDate,
        PurchaseCost,
        SupplierId,
        WarrantyExpiry,
        ExpiryDate,
        ReorderLevel,
        MaxStockLevel,
        IsActive,
        IsLoanable,
        LoanDurationDays,
        Tags,
        Notes,
        Weight,
        Dimensions,
        CurrentValue,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_product_variants_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_product_variants_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductVariants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductVariants::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::ParentItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::VariantName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::VariantValue)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductVariants::Sku).string().null())
                        .col(ColumnDef::new(ProductVariants::Barcode).string().null())
                        .col(
                            ColumnDef::new(ProductVariants::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::AdditionalCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_variants_parent_item_id")
                        .table(ProductVariants::Table)
                        .col(ProductVariants::ParentItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductVariants {
        Table,
        Id,
        ParentItemId,
        VariantName,
        VariantValue,
        Sku,
        Barcode,
        Quantity,
        AdditionalCost,
        IsActive,
        CreatedAt,
    }
}

mod m20240101_000007_create_stock_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::ItemId).integer().not_null())
                        .col(
                            ColumnDef::new(StockMovements::MovementType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::UnitCost).decimal().null())
                        .col(ColumnDef::new(StockMovements::TotalCost).decimal().null())
                        .col(
                            ColumnDef::new(StockMovements::FromLocationId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::ToLocationId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockMovements::ReferenceId).integer().null())
                        .col(
                            ColumnDef::new(StockMovements::ReferenceType)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(StockMovements::UserId).integer().null())
                        .col(ColumnDef::new(StockMovements::Reason).string().null())
                        .col(ColumnDef::new(StockMovements::Notes).string().null())
                        .col(
                            ColumnDef::new(StockMovements::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_item_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_created_at")
                        .table(StockMovements::Table)
                        .col(StockMovements::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        ItemId,
        MovementType,
        Quantity,
        UnitCost,
        TotalCost,
        FromLocationId,
        ToLocationId,
        ReferenceId,
        ReferenceType,
        UserId,
        Reason,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000008_create_stock_alerts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_stock_alerts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockAlerts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockAlerts::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockAlerts::ItemId).integer().not_null())
                        .col(ColumnDef::new(StockAlerts::AlertType).string().not_null())
                        .col(
                            ColumnDef::new(StockAlerts::ThresholdValue)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockAlerts::CurrentValue).integer().null())
                        .col(ColumnDef::new(StockAlerts::Message).string().not_null())
                        .col(
                            ColumnDef::new(StockAlerts::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StockAlerts::AcknowledgedBy)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockAlerts::AcknowledgedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockAlerts::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_alerts_item_id_active")
                        .table(StockAlerts::Table)
                        .col(StockAlerts::ItemId)
                        .col(StockAlerts::IsActive)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockAlerts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockAlerts {
        Table,
        Id,
        ItemId,
        AlertType,
        ThresholdValue,
        CurrentValue,
        Message,
        IsActive,
        AcknowledgedBy,
        AcknowledgedAt,
        CreatedAt,
    }
}

mod m20240101_000009_create_inventory_valuations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_inventory_valuations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryValuations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryValuations::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::ItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::ValuationMethod)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::CostPerUnit)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::TotalValue)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::ValuationDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryValuations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_valuations_item_id")
                        .table(InventoryValuations::Table)
                        .col(InventoryValuations::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryValuations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryValuations {
        Table,
        Id,
        ItemId,
        ValuationMethod,
        CostPerUnit,
        Quantity,
        TotalValue,
        ValuationDate,
        CreatedAt,
    }
}

mod m20240101_000010_create_bookings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_bookings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bookings::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Bookings::ItemId).integer().not_null())
                        .col(ColumnDef::new(Bookings::UserId).integer().not_null())
                        .col(ColumnDef::new(Bookings::KaupapaName).string().not_null())
                        .col(
                            ColumnDef::new(Bookings::KaupapaDescription)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Bookings::WhanauGroup).string().null())
                        .col(
                            ColumnDef::new(Bookings::QuantityRequested)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Bookings::BookingDate).date().not_null())
                        .col(ColumnDef::new(Bookings::StartDate).date().not_null())
                        .col(ColumnDef::new(Bookings::EndDate).date().not_null())
                        .col(ColumnDef::new(Bookings::ReturnDate).date().null())
                        .col(
                            ColumnDef::new(Bookings::Status)
                                .string()
                                .not_null()
                                .default("Pending"),
                        )
                        .col(ColumnDef::new(Bookings::ApprovedBy).integer().null())
                        .col(ColumnDef::new(Bookings::ApprovedAt).timestamp().null())
                        .col(ColumnDef::new(Bookings::ReturnCondition).string().null())
                        .col(ColumnDef::new(Bookings::DamageAssessment).string().null())
                        .col(ColumnDef::new(Bookings::LateReturnFee).decimal().null())
                        .col(ColumnDef::new(Bookings::DamageFee).decimal().null())
                        .col(ColumnDef::new(Bookings::Notes).string().null())
                        .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Bookings::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_item_id")
                        .table(Bookings::Table)
                        .col(Bookings::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_user_id")
                        .table(Bookings::Table)
                        .col(Bookings::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_status")
                        .table(Bookings::Table)
                        .col(Bookings::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        Id,
        ItemId,
        UserId,
        KaupapaName,
        KaupapaDescription,
        WhanauGroup,
        QuantityRequested,
        BookingDate,
        StartDate,
        EndDate,
        ReturnDate,
        Status,
        ApprovedBy,
        ApprovedAt,
        ReturnCondition,
        DamageAssessment,
        LateReturnFee,
        DamageFee,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000011_create_stock_transfers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000011_create_stock_transfers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockTransfers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockTransfers::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::TransferNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StockTransfers::ItemId).integer().not_null())
                        .col(
                            ColumnDef::new(StockTransfers::FromLocationId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::ToLocationId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::Status)
                                .string()
                                .not_null()
                                .default("PENDING"),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::RequestedBy)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockTransfers::ApprovedBy).integer().null())
                        .col(ColumnDef::new(StockTransfers::ReceivedBy).integer().null())
                        .col(ColumnDef::new(StockTransfers::Reason).string().null())
                        .col(ColumnDef::new(StockTransfers::Notes).string().null())
                        .col(
                            ColumnDef::new(StockTransfers::CompletedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockTransfers::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockTransfers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockTransfers {
        Table,
        Id,
        TransferNumber,
        ItemId,
        FromLocationId,
        ToLocationId,
        Quantity,
        Status,
        RequestedBy,
        ApprovedBy,
        ReceivedBy,
        Reason,
        Notes,
        CompletedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000012_create_purchasing_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000012_create_purchasing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string()
                                .not_null()
                                .default("DRAFT"),
                        )
                        .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDeliveryDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ActualDeliveryDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Currency)
                                .string()
                                .not_null()
                                .default("NZD"),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PaymentTerms)
                                .string()
                                .not_null()
                                .default("Net 30"),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DeliveryAddress)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedBy)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::ApprovedBy).integer().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::ApprovedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_supplier_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::PurchaseOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderItems::ItemId).integer().null())
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::TaxRate)
                                .decimal()
                                .not_null()
                                .default(0.15),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::ReceivedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_order_items_po_id")
                        .table(PurchaseOrderItems::Table)
                        .col(PurchaseOrderItems::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        PoNumber,
        SupplierId,
        Status,
        OrderDate,
        ExpectedDeliveryDate,
        ActualDeliveryDate,
        Subtotal,
        TaxAmount,
        TotalAmount,
        Currency,
        PaymentTerms,
        DeliveryAddress,
        Notes,
        CreatedBy,
        ApprovedBy,
        ApprovedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderItems {
        Table,
        Id,
        PurchaseOrderId,
        ItemId,
        Description,
        Quantity,
        UnitPrice,
        TaxRate,
        TotalPrice,
        ReceivedQuantity,
        CreatedAt,
    }
}

mod m20240101_000013_create_grn_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000013_create_grn_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(GoodsReceivedNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::GrnNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::PurchaseOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::ReceivedDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::ReceivedBy)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GoodsReceivedNotes::Notes).string().null())
                        .col(
                            ColumnDef::new(GoodsReceivedNotes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GrnItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GrnItems::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GrnItems::GrnId).integer().not_null())
                        .col(
                            ColumnDef::new(GrnItems::PurchaseOrderItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GrnItems::QuantityReceived)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GrnItems::ConditionStatus).string().null())
                        .col(ColumnDef::new(GrnItems::ExpiryDate).date().null())
                        .col(ColumnDef::new(GrnItems::BatchNumber).string().null())
                        .col(ColumnDef::new(GrnItems::Notes).string().null())
                        .col(ColumnDef::new(GrnItems::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_grn_items_grn_id")
                        .table(GrnItems::Table)
                        .col(GrnItems::GrnId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GrnItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GoodsReceivedNotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum GoodsReceivedNotes {
        Table,
        Id,
        GrnNumber,
        PurchaseOrderId,
        ReceivedDate,
        ReceivedBy,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum GrnItems {
        Table,
        Id,
        GrnId,
        PurchaseOrderItemId,
        QuantityReceived,
        ConditionStatus,
        ExpiryDate,
        BatchNumber,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000014_create_audit_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000014_create_audit_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AuditLog::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AuditLog::UserId).integer().null())
                        .col(ColumnDef::new(AuditLog::Action).string().not_null())
                        .col(ColumnDef::new(AuditLog::TableName).string().not_null())
                        .col(ColumnDef::new(AuditLog::RecordId).integer().null())
                        .col(ColumnDef::new(AuditLog::OldValues).string().null())
                        .col(ColumnDef::new(AuditLog::NewValues).string().null())
                        .col(ColumnDef::new(AuditLog::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AuditLog {
        Table,
        Id,
        UserId,
        Action,
        TableName,
        RecordId,
        OldValues,
        NewValues,
        CreatedAt,
    }
}
