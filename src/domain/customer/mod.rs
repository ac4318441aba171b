//! Customer entity, shared between book stores

pub mod model;
pub mod repository;

pub use model::Customer;
pub use repository::CustomerRepository;
