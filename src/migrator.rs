use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_items_table::Migration),
            Box::new(m20250110_000002_create_inventory_events_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250110_000001_create_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000001_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create items table aligned with entities::item Model
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).string().primary_key().not_null())
                        .col(ColumnDef::new(Items::Name).string().not_null())
                        .col(ColumnDef::new(Items::Sku).string().null())
                        .col(ColumnDef::new(Items::Upc).string().null())
                        .col(
                            ColumnDef::new(Items::UnitCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::RetailPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::QuantityOnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Items::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Alternate identifiers are looked up in bulk during resolution
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_sku")
                        .table(Items::Table)
                        .col(Items::Sku)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_upc")
                        .table(Items::Table)
                        .col(Items::Upc)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Items {
        Table,
        Id,
        Name,
        Sku,
        Upc,
        UnitCost,
        RetailPrice,
        QuantityOnHand,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000002_create_inventory_events_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000002_create_inventory_events_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Append-only stock ledger aligned with entities::inventory_event Model
            manager
                .create_table(
                    Table::create()
                        .table(InventoryEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryEvents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryEvents::ItemId).string().not_null())
                        .col(
                            ColumnDef::new(InventoryEvents::QuantityDelta)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryEvents::Reason).string().not_null())
                        .col(
                            ColumnDef::new(InventoryEvents::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryEvents::LocationId)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // History scans read one item's ledger in time order
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_events_item_occurred")
                        .table(InventoryEvents::Table)
                        .col(InventoryEvents::ItemId)
                        .col(InventoryEvents::OccurredAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_events_location")
                        .table(InventoryEvents::Table)
                        .col(InventoryEvents::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryEvents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InventoryEvents {
        Table,
        Id,
        ItemId,
        QuantityDelta,
        Reason,
        OccurredAt,
        LocationId,
    }
}
