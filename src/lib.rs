//! # Book Store Service
//!
//! REST backend for book stores, their employees, customers and books.
//!
//! ## Architecture
//!
//! - **domain**: entities, repository traits and the find-or-create tag
//! - **application**: the aggregate service and its projections
//! - **infrastructure**: SeaORM/SQLite persistence and in-memory storage
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types and shutdown signalling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use application::BookStoreService;
pub use interfaces::http::create_api_router;
