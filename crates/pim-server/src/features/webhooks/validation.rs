//! Shared webhook field validation

use thiserror::Error;

use crate::events;

/// Hard cap on webhook URL length
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookValidationError {
    #[error("Webhook URL must start with http:// or https://")]
    InvalidUrlScheme,
    #[error("Webhook URL must not exceed {MAX_URL_LENGTH} characters")]
    UrlTooLong,
    #[error("At least one event type is required")]
    EventTypesRequired,
    #[error("Invalid event types: {0}")]
    UnknownEventTypes(String),
}

pub fn validate_url(url: &str) -> Result<(), WebhookValidationError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(WebhookValidationError::InvalidUrlScheme);
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(WebhookValidationError::UrlTooLong);
    }
    Ok(())
}

pub fn validate_event_types(event_types: &[String]) -> Result<(), WebhookValidationError> {
    if event_types.is_empty() {
        return Err(WebhookValidationError::EventTypesRequired);
    }

    let mut unknown: Vec<&str> = event_types
        .iter()
        .filter(|t| !events::is_known_event(t))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        unknown.dedup();
        return Err(WebhookValidationError::UnknownEventTypes(unknown.join(", ")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_scheme() {
        assert!(validate_url("http://example.test/hook").is_ok());
        assert!(validate_url("https://example.test/hook").is_ok());
        assert!(validate_url("  https://example.test/hook  ").is_ok());
        assert_eq!(
            validate_url("ftp://example.test/hook"),
            Err(WebhookValidationError::InvalidUrlScheme)
        );
        assert_eq!(validate_url(""), Err(WebhookValidationError::InvalidUrlScheme));
    }

    #[test]
    fn test_url_length_cap() {
        let url = format!("https://example.test/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_url(&url), Err(WebhookValidationError::UrlTooLong));
    }

    #[test]
    fn test_event_types_must_be_non_empty() {
        assert_eq!(
            validate_event_types(&[]),
            Err(WebhookValidationError::EventTypesRequired)
        );
    }

    #[test]
    fn test_event_types_must_be_known() {
        let types = vec!["user.created".to_string(), "order.shipped".to_string()];
        assert_eq!(
            validate_event_types(&types),
            Err(WebhookValidationError::UnknownEventTypes("order.shipped".to_string()))
        );

        let types = vec!["user.created".to_string(), "payment.completed".to_string()];
        assert!(validate_event_types(&types).is_ok());
    }
}
