pub mod dto;
pub mod services;

// Re-export key types for convenience
pub use dto::{BookStoreBook, BookStoreCustomer, BookStoreData, BookStoreEmployee};
pub use services::BookStoreService;
