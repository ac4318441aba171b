//! Database repository implementations
//!
//! Per-entity SeaORM repositories + unified RepositoryProvider.
//! Each repository is generic over the connection so the same code serves the
//! pool and a transaction.

pub mod book_repository;
pub mod book_store_repository;
pub mod customer_repository;
pub mod employee_repository;
pub mod repository_provider;

pub use repository_provider::{SeaOrmRepositoryProvider, SeaOrmUnitOfWork};

use crate::domain::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    tracing::error!("Database error: {}", e);
    DomainError::from(e)
}

