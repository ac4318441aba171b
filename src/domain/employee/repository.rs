//! Employee repository interface

use async_trait::async_trait;

use super::model::Employee;
use crate::domain::DomainResult;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Employee>>;
    async fn find_all(&self) -> DomainResult<Vec<Employee>>;
    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Employee>>;
    async fn save(&self, employee: Employee) -> DomainResult<Employee>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
    /// Removes every employee of a store; returns how many were removed.
    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64>;
}
