//! Database entities module

pub mod book;
pub mod book_store;
pub mod book_store_customer;
pub mod customer;
pub mod employee;

pub use book::Entity as Book;
pub use book_store::Entity as BookStore;
pub use book_store_customer::Entity as BookStoreCustomer;
pub use customer::Entity as Customer;
pub use employee::Entity as Employee;
