//! Product catalog feature

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::products_routes;
pub use types::Product;
