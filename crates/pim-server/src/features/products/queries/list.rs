use serde::Deserialize;
use sqlx::PgPool;

use crate::features::products::types::Product;

/// Hard cap on page size
pub const MAX_LIMIT: i64 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Case-insensitive substring match against sku and name
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, thiserror::Error)]
pub enum ListProductsError {
    #[error("offset must not be negative")]
    InvalidOffset,
    #[error("limit must be between 1 and {MAX_LIMIT}")]
    InvalidLimit,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListProductsQuery {
    pub fn validate(&self) -> Result<(), ListProductsError> {
        if self.offset < 0 {
            return Err(ListProductsError::InvalidOffset);
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(ListProductsError::InvalidLimit);
        }
        Ok(())
    }
}

/// Paginated product listing with optional case-insensitive search
#[tracing::instrument(skip(pool, query), fields(offset = query.offset, limit = query.limit))]
pub async fn handle(
    pool: PgPool,
    query: ListProductsQuery,
) -> Result<Vec<Product>, ListProductsError> {
    query.validate()?;

    let products = match query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(search) => {
            let pattern = format!("%{}%", search.to_lowercase());
            sqlx::query_as::<_, Product>(
                r#"
                SELECT sku, name, description, is_active
                FROM products
                WHERE lower(sku) LIKE $1 OR lower(name) LIKE $1
                ORDER BY sku
                OFFSET $2 LIMIT $3
                "#,
            )
            .bind(&pattern)
            .bind(query.offset)
            .bind(query.limit)
            .fetch_all(&pool)
            .await?
        },
        None => {
            sqlx::query_as::<_, Product>(
                r#"
                SELECT sku, name, description, is_active
                FROM products
                ORDER BY sku
                OFFSET $1 LIMIT $2
                "#,
            )
            .bind(query.offset)
            .bind(query.limit)
            .fetch_all(&pool)
            .await?
        },
    };

    tracing::debug!(count = products.len(), "products listed");

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(offset: i64, limit: i64) -> ListProductsQuery {
        ListProductsQuery {
            offset,
            limit,
            search: None,
        }
    }

    #[test]
    fn test_validation_defaults_ok() {
        assert!(query(0, 50).validate().is_ok());
    }

    #[test]
    fn test_validation_negative_offset() {
        assert!(matches!(
            query(-1, 50).validate(),
            Err(ListProductsError::InvalidOffset)
        ));
    }

    #[test]
    fn test_validation_limit_bounds() {
        assert!(matches!(
            query(0, 0).validate(),
            Err(ListProductsError::InvalidLimit)
        ));
        assert!(matches!(
            query(0, MAX_LIMIT + 1).validate(),
            Err(ListProductsError::InvalidLimit)
        ));
        assert!(query(0, MAX_LIMIT).validate().is_ok());
    }
}
