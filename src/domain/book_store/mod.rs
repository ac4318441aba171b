//! BookStore aggregate root

pub mod model;
pub mod repository;

pub use model::BookStore;
pub use repository::BookStoreRepository;
