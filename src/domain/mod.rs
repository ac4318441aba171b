//! Domain layer: entities, repository interfaces and the find-or-create tag.

pub mod book;
pub mod book_store;
pub mod customer;
pub mod employee;
pub mod lookup;
pub mod repositories;

// Re-export commonly used types
pub use book::{Book, BookRepository};
pub use book_store::{BookStore, BookStoreRepository};
pub use customer::{Customer, CustomerRepository};
pub use employee::{Employee, EmployeeRepository};
pub use lookup::Lookup;
pub use repositories::{DomainResult, Repositories, RepositoryProvider, UnitOfWork};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
