//! Product domain types

use serde::{Deserialize, Serialize};

/// A persisted catalog record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}
