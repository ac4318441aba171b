//! Create books table

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
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::BookStoreId).integer().not_null())
                    .col(ColumnDef::new(Books::Genre).string_len(255))
                    .col(ColumnDef::new(Books::Price).string_len(255))
                    .col(ColumnDef::new(Books::Description).string_len(255))
                    .col(ColumnDef::new(Books::Author).string_len(255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_book_store")
                            .from(Books::Table, Books::BookStoreId)
                            .to(BookStores::Table, BookStores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_book_store")
                    .table(Books::Table)
                    .col(Books::BookStoreId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
    BookStoreId,
    Genre,
    Price,
    Description,
    Author,
}
