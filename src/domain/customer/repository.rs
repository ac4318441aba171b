//! Customer repository interface
//!
//! Membership of customers in book stores lives in an association table that
//! this repository owns: `link` / `unlink_book_store` are the only writers.

use async_trait::async_trait;

use super::model::Customer;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Customer>>;
    async fn find_all(&self) -> DomainResult<Vec<Customer>>;
    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Customer>>;
    /// Ids of every book store the customer is associated with.
    async fn find_book_store_ids(&self, customer_id: i64) -> DomainResult<Vec<i64>>;
    async fn save(&self, customer: Customer) -> DomainResult<Customer>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
    /// Associates a customer with a store. Linking twice is a no-op.
    async fn link(&self, book_store_id: i64, customer_id: i64) -> DomainResult<()>;
    /// Drops every association of a store; the customers themselves stay.
    async fn unlink_book_store(&self, book_store_id: i64) -> DomainResult<u64>;
}
