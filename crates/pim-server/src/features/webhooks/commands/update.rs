use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::webhooks::types::Webhook;
use crate::features::webhooks::validation::{self, WebhookValidationError};

/// Partial update: absent fields keep their stored value
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWebhookCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub url: Option<String>,
    pub event_types: Option<Vec<String>>,
    pub is_enabled: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateWebhookError {
    #[error("No fields to update")]
    NoFieldsToUpdate,
    #[error(transparent)]
    Validation(#[from] WebhookValidationError),
    #[error("Webhook with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateWebhookCommand {
    pub fn validate(&self) -> Result<(), UpdateWebhookError> {
        if self.url.is_none() && self.event_types.is_none() && self.is_enabled.is_none() {
            return Err(UpdateWebhookError::NoFieldsToUpdate);
        }
        if let Some(ref url) = self.url {
            validation::validate_url(url)?;
        }
        if let Some(ref event_types) = self.event_types {
            validation::validate_event_types(event_types)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(webhook_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateWebhookCommand,
) -> Result<Webhook, UpdateWebhookError> {
    command.validate()?;

    let url = command.url.as_deref().map(str::trim).map(str::to_string);

    let webhook = sqlx::query_as::<_, Webhook>(
        r#"
        UPDATE webhooks SET
            url = COALESCE($2, url),
            event_types = COALESCE($3, event_types),
            is_enabled = COALESCE($4, is_enabled),
            updated_at = now()
        WHERE id = $1
        RETURNING id, url, event_types, is_enabled, created_at, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&url)
    .bind(&command.event_types)
    .bind(command.is_enabled)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateWebhookError::NotFound(command.id))?;

    tracing::info!(webhook_id = %webhook.id, "webhook updated");

    Ok(webhook)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> UpdateWebhookCommand {
        UpdateWebhookCommand {
            id: Uuid::new_v4(),
            url: None,
            event_types: None,
            is_enabled: None,
        }
    }

    #[test]
    fn test_validation_requires_some_field() {
        assert!(matches!(
            command().validate(),
            Err(UpdateWebhookError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_validation_enabled_flag_alone_is_enough() {
        let mut cmd = command();
        cmd.is_enabled = Some(false);
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation_checks_provided_url() {
        let mut cmd = command();
        cmd.url = Some("not-a-url".to_string());
        assert!(matches!(
            cmd.validate(),
            Err(UpdateWebhookError::Validation(
                WebhookValidationError::InvalidUrlScheme
            ))
        ));
    }

    #[test]
    fn test_validation_checks_provided_event_types() {
        let mut cmd = command();
        cmd.event_types = Some(vec![]);
        assert!(matches!(
            cmd.validate(),
            Err(UpdateWebhookError::Validation(
                WebhookValidationError::EventTypesRequired
            ))
        ));
    }
}
