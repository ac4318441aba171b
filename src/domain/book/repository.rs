//! Book repository interface

use async_trait::async_trait;

use super::model::Book;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Book>>;
    async fn find_all(&self) -> DomainResult<Vec<Book>>;
    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Book>>;
    async fn save(&self, book: Book) -> DomainResult<Book>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64>;
}
