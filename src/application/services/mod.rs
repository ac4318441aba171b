//! Application services

mod book_store;

pub use book_store::BookStoreService;
