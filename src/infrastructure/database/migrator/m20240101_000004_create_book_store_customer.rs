//! Create book_store_customer association table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_book_stores::BookStores;
use super::m20240101_000003_create_customers::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookStoreCustomer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookStoreCustomer::BookStoreId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookStoreCustomer::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BookStoreCustomer::BookStoreId)
                            .col(BookStoreCustomer::CustomerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_store_customer_book_store")
                            .from(BookStoreCustomer::Table, BookStoreCustomer::BookStoreId)
                            .to(BookStores::Table, BookStores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_store_customer_customer")
                            .from(BookStoreCustomer::Table, BookStoreCustomer::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookups by customer ("which stores is this customer in?")
        manager
            .create_index(
                Index::create()
                    .name("idx_book_store_customer_customer")
                    .table(BookStoreCustomer::Table)
                    .col(BookStoreCustomer::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookStoreCustomer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookStoreCustomer {
    Table,
    BookStoreId,
    CustomerId,
}
