//! Repository access for the domain layer
//!
//! Contains:
//! - `Repositories`: per-entity repository accessors
//! - `RepositoryProvider`: long-lived access backed by the connection pool,
//!   able to open a unit of work
//! - `UnitOfWork`: repositories bound to one transaction
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::book::BookRepository;
use super::book_store::BookStoreRepository;
use super::customer::CustomerRepository;
use super::employee::EmployeeRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Per-entity repository accessors shared by the pool-backed provider and by
/// a unit of work:
///
/// ```ignore
/// async fn handle(repos: &dyn Repositories) {
///     let store = repos.book_stores().find_by_id(1).await?;
///     let staff = repos.employees().find_by_book_store(1).await?;
/// }
/// ```
pub trait Repositories: Send + Sync {
    fn book_stores(&self) -> &dyn BookStoreRepository;
    fn employees(&self) -> &dyn EmployeeRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn books(&self) -> &dyn BookRepository;
}

/// Provides access to all domain repositories outside of a transaction.
#[async_trait]
pub trait RepositoryProvider: Repositories {
    /// Opens a unit of work. Writes made through it become visible to others
    /// only after `commit`. Write units of work run one at a time.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;

    /// Opens a unit of work for a consistent multi-query read. Read units of
    /// work do not wait for each other; they are dropped, never committed.
    async fn begin_read(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// Repositories bound to a single transaction.
///
/// Dropping a unit of work without calling `commit` rolls it back.
#[async_trait]
pub trait UnitOfWork: Repositories {
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
