use serde::Deserialize;
use sqlx::PgPool;

use crate::features::webhooks::types::Webhook;
use crate::features::webhooks::validation::{self, WebhookValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWebhookCommand {
    pub url: String,
    pub event_types: Vec<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum CreateWebhookError {
    #[error(transparent)]
    Validation(#[from] WebhookValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateWebhookCommand {
    pub fn validate(&self) -> Result<(), WebhookValidationError> {
        validation::validate_url(&self.url)?;
        validation::validate_event_types(&self.event_types)
    }
}

#[tracing::instrument(skip(pool, command), fields(url = %command.url))]
pub async fn handle(
    pool: PgPool,
    command: CreateWebhookCommand,
) -> Result<Webhook, CreateWebhookError> {
    command.validate()?;

    let url = command.url.trim().to_string();

    let webhook = sqlx::query_as::<_, Webhook>(
        r#"
        INSERT INTO webhooks (url, event_types, is_enabled)
        VALUES ($1, $2, $3)
        RETURNING id, url, event_types, is_enabled, created_at, updated_at
        "#,
    )
    .bind(&url)
    .bind(&command.event_types)
    .bind(command.is_enabled)
    .fetch_one(&pool)
    .await?;

    tracing::info!(webhook_id = %webhook.id, url = %webhook.url, "webhook created");

    Ok(webhook)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(url: &str, event_types: &[&str]) -> CreateWebhookCommand {
        CreateWebhookCommand {
            url: url.to_string(),
            event_types: event_types.iter().map(|s| s.to_string()).collect(),
            is_enabled: true,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("https://example.test/hook", &["user.created"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validation_bad_scheme() {
        assert_eq!(
            command("example.test/hook", &["user.created"]).validate(),
            Err(WebhookValidationError::InvalidUrlScheme)
        );
    }

    #[test]
    fn test_validation_empty_event_types() {
        assert_eq!(
            command("https://example.test/hook", &[]).validate(),
            Err(WebhookValidationError::EventTypesRequired)
        );
    }

    #[test]
    fn test_validation_unknown_event_type() {
        assert!(matches!(
            command("https://example.test/hook", &["order.shipped"]).validate(),
            Err(WebhookValidationError::UnknownEventTypes(_))
        ));
    }
}
