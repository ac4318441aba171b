//! Book entity, owned by exactly one book store

pub mod model;
pub mod repository;

pub use model::Book;
pub use repository::BookRepository;
