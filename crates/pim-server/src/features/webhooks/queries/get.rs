use sqlx::PgPool;
use uuid::Uuid;

use crate::features::webhooks::types::Webhook;

#[derive(Debug, Clone)]
pub struct GetWebhookQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetWebhookError {
    #[error("Webhook with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(webhook_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetWebhookQuery) -> Result<Webhook, GetWebhookError> {
    sqlx::query_as::<_, Webhook>(
        r#"
        SELECT id, url, event_types, is_enabled, created_at, updated_at
        FROM webhooks
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetWebhookError::NotFound(query.id))
}
