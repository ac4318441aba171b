//! Create employees table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_book_stores::BookStores;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::BookStoreId).integer().not_null())
                    .col(ColumnDef::new(Employees::FirstName).string_len(255))
                    .col(ColumnDef::new(Employees::LastName).string_len(255))
                    .col(ColumnDef::new(Employees::Phone).string_len(255))
                    .col(ColumnDef::new(Employees::JobTitle).string_len(255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_book_store")
                            .from(Employees::Table, Employees::BookStoreId)
                            .to(BookStores::Table, BookStores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_book_store")
                    .table(Employees::Table)
                    .col(Employees::BookStoreId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Employees {
    Table,
    Id,
    BookStoreId,
    FirstName,
    LastName,
    Phone,
    JobTitle,
}
