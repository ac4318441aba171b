//! BookStore repository interface

use async_trait::async_trait;

use super::model::BookStore;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookStoreRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookStore>>;
    async fn find_all(&self) -> DomainResult<Vec<BookStore>>;
    /// Inserts when `store.id` is `None`, otherwise overwrites the stored row.
    async fn save(&self, store: BookStore) -> DomainResult<BookStore>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
