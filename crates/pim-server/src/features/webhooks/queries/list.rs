use serde::Deserialize;
use sqlx::PgPool;

use crate::features::webhooks::types::Webhook;

/// Hard cap on page size
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct ListWebhooksQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, thiserror::Error)]
pub enum ListWebhooksError {
    #[error("offset must not be negative")]
    InvalidOffset,
    #[error("limit must be between 1 and {MAX_LIMIT}")]
    InvalidLimit,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListWebhooksQuery {
    pub fn validate(&self) -> Result<(), ListWebhooksError> {
        if self.offset < 0 {
            return Err(ListWebhooksError::InvalidOffset);
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(ListWebhooksError::InvalidLimit);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, query), fields(offset = query.offset, limit = query.limit))]
pub async fn handle(
    pool: PgPool,
    query: ListWebhooksQuery,
) -> Result<Vec<Webhook>, ListWebhooksError> {
    query.validate()?;

    let webhooks = sqlx::query_as::<_, Webhook>(
        r#"
        SELECT id, url, event_types, is_enabled, created_at, updated_at
        FROM webhooks
        ORDER BY created_at DESC
        OFFSET $1 LIMIT $2
        "#,
    )
    .bind(query.offset)
    .bind(query.limit)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = webhooks.len(), "webhooks listed");

    Ok(webhooks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_bounds() {
        let query = ListWebhooksQuery {
            offset: 0,
            limit: 50,
        };
        assert!(query.validate().is_ok());

        let query = ListWebhooksQuery {
            offset: -1,
            limit: 50,
        };
        assert!(matches!(query.validate(), Err(ListWebhooksError::InvalidOffset)));

        let query = ListWebhooksQuery {
            offset: 0,
            limit: MAX_LIMIT + 1,
        };
        assert!(matches!(query.validate(), Err(ListWebhooksError::InvalidLimit)));
    }
}
