//! Create book_stores table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookStores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookStores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookStores::Name).string_len(255))
                    .col(ColumnDef::new(BookStores::Address).string_len(255))
                    .col(ColumnDef::new(BookStores::City).string_len(255))
                    .col(ColumnDef::new(BookStores::State).string_len(255))
                    .col(ColumnDef::new(BookStores::Zip).string_len(255))
                    .col(ColumnDef::new(BookStores::Phone).string_len(255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookStores::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookStores {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Zip,
    Phone,
}
