use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_material_table::Migration)]
    }
}

mod m20240101_000001_create_material_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_material_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Aligned with entities::material Model
            manager
                .create_table(
                    Table::create()
                        .table(Material::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Material::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Material::Design).string().not_null())
                        .col(
                            ColumnDef::new(Material::State)
                                .string()
                                .not_null()
                                .default("GOOD"),
                        )
                        .col(ColumnDef::new(Material::Quantity).integer().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Material::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Material {
        Table,
        Id,
        Design,
        State,
        Quantity,
    }
}
