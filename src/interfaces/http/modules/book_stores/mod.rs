//! Book store aggregate endpoints

pub mod handlers;

pub use handlers::*;
