//! Data transfer objects shared by the service and the HTTP layer

mod book_store;

pub use book_store::{BookStoreBook, BookStoreCustomer, BookStoreData, BookStoreEmployee};
