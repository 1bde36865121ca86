use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DeleteWebhookCommand {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteWebhookError {
    #[error("Webhook with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(webhook_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteWebhookCommand) -> Result<(), DeleteWebhookError> {
    let result = sqlx::query("DELETE FROM webhooks WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteWebhookError::NotFound(command.id));
    }

    tracing::info!(webhook_id = %command.id, "webhook deleted");

    Ok(())
}
