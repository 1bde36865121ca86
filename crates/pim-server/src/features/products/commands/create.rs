use serde::Deserialize;
use sqlx::PgPool;

use crate::features::products::types::Product;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductCommand {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum CreateProductError {
    #[error("SKU cannot be empty")]
    SkuRequired,
    #[error("Product name cannot be empty")]
    NameRequired,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateProductCommand {
    pub fn validate(&self) -> Result<(), CreateProductError> {
        if self.sku.trim().is_empty() {
            return Err(CreateProductError::SkuRequired);
        }
        if self.name.trim().is_empty() {
            return Err(CreateProductError::NameRequired);
        }
        Ok(())
    }
}

/// Upsert a single product. The sku is normalized the same way the ingestion
/// pipeline normalizes it, so manual writes and catalog imports agree on the
/// key.
#[tracing::instrument(skip(pool, command), fields(sku = %command.sku))]
pub async fn handle(
    pool: PgPool,
    command: CreateProductCommand,
) -> Result<Product, CreateProductError> {
    command.validate()?;

    let sku = command.sku.trim().to_lowercase();
    let name = command.name.trim().to_string();
    let description = command
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (sku, name, description, is_active)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (sku) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            is_active = EXCLUDED.is_active
        RETURNING sku, name, description, is_active
        "#,
    )
    .bind(&sku)
    .bind(&name)
    .bind(&description)
    .bind(command.is_active)
    .fetch_one(&pool)
    .await?;

    tracing::info!(sku = %product.sku, "product upserted");

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(sku: &str, name: &str) -> CreateProductCommand {
        CreateProductCommand {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("ABC-1", "Widget").validate().is_ok());
    }

    #[test]
    fn test_validation_empty_sku() {
        assert!(matches!(
            command("   ", "Widget").validate(),
            Err(CreateProductError::SkuRequired)
        ));
    }

    #[test]
    fn test_validation_empty_name() {
        assert!(matches!(
            command("abc-1", "").validate(),
            Err(CreateProductError::NameRequired)
        ));
    }
}
