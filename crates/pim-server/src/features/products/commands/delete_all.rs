use sqlx::PgPool;

/// Truncate the products table
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE products").execute(&pool).await?;
    tracing::info!("products table truncated");
    Ok(())
}
