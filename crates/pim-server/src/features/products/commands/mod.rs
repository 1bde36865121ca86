pub mod create;
pub mod delete_all;

pub use create::{CreateProductCommand, CreateProductError};
