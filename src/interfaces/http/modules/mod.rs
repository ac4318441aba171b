pub mod book_stores;
pub mod health;
pub mod metrics;
pub mod request_id;
