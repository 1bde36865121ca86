//! Webhook domain types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered webhook endpoint as stored
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Webhook {
    pub id: Uuid,
    pub url: String,
    pub event_types: Vec<String>,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Subset-membership test: is this endpoint subscribed to `event_type`?
    pub fn is_subscribed_to(&self, event_type: &str) -> bool {
        self.event_types.iter().any(|t| t == event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(url: &str, event_types: &[&str], is_enabled: bool) -> Webhook {
        Webhook {
            id: Uuid::new_v4(),
            url: url.to_string(),
            event_types: event_types.iter().map(|s| s.to_string()).collect(),
            is_enabled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subscription_membership() {
        let hook = webhook("http://example.test/hook", &["user.created", "payment.completed"], true);
        assert!(hook.is_subscribed_to("user.created"));
        assert!(!hook.is_subscribed_to("user.modified"));
    }
}
