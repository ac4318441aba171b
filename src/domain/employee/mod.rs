//! Employee entity, owned by exactly one book store

pub mod model;
pub mod repository;

pub use model::Employee;
pub use repository::EmployeeRepository;
