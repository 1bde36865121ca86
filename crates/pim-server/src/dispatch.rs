//! Webhook dispatch
//!
//! Fans a triggered domain event out to every enabled webhook subscribed to
//! its event type. Each delivery runs as its own detached task: one outbound
//! POST bounded by a fixed timeout, logged, never retried, never able to
//! affect a sibling delivery or the triggering request.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::features::webhooks::types::Webhook;
use crate::tasks::spawn_detached;

/// Outcome of a synchronous test delivery
#[derive(Debug, Clone, Serialize)]
pub struct WebhookTestOutcome {
    pub success: bool,
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Resolves subscribed endpoints and performs isolated deliveries
#[derive(Clone)]
pub struct WebhookDispatcher {
    db: PgPool,
    http: reqwest::Client,
    timeout: Duration,
}

impl WebhookDispatcher {
    pub fn new(db: PgPool, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { db, http, timeout })
    }

    /// Trigger `event_type`: schedule one detached delivery per enabled,
    /// subscribed webhook and return immediately.
    ///
    /// Never raises outward; a failure to read the webhook table is logged
    /// and the trigger becomes a no-op.
    pub async fn trigger(&self, event_type: &str, payload: Value) {
        let webhooks = match self.enabled_webhooks().await {
            Ok(webhooks) => webhooks,
            Err(e) => {
                error!(event_type, error = %e, "failed to load webhooks for event trigger");
                return;
            },
        };

        let matched: Vec<Webhook> = webhooks
            .into_iter()
            .filter(|w| w.is_subscribed_to(event_type))
            .collect();

        info!(event_type, webhooks = matched.len(), "triggering event");

        for webhook in matched {
            let client = self.http.clone();
            let event_type = event_type.to_string();
            let payload = payload.clone();
            spawn_detached("webhook-delivery", async move {
                deliver(client, webhook, &event_type, payload).await;
                Ok(())
            });
        }
    }

    /// Synchronously POST a fixed diagnostic payload to `url` and report the
    /// outcome. Timeout, network error and non-2xx are all not-success, each
    /// with its own error description.
    pub async fn test_delivery(&self, url: &str) -> WebhookTestOutcome {
        let payload = json!({
            "event": "test",
            "message": "Webhook test trigger",
            "timestamp": Utc::now().to_rfc3339(),
        });

        let started = Instant::now();
        match self.http.post(url).json(&payload).send().await {
            Ok(response) => {
                let response_time_ms = started.elapsed().as_millis() as u64;
                let status = response.status();
                info!(url, status = status.as_u16(), response_time_ms, "webhook test finished");

                WebhookTestOutcome {
                    success: status.is_success(),
                    status_code: Some(status.as_u16()),
                    response_time_ms,
                    error: if status.is_success() {
                        None
                    } else {
                        Some(format!("HTTP {}", status.as_u16()))
                    },
                }
            },
            Err(e) => {
                let response_time_ms = started.elapsed().as_millis() as u64;
                let error = if e.is_timeout() {
                    format!("Request timeout after {}s", self.timeout.as_secs())
                } else if e.is_connect() {
                    format!("Connection error: {e}")
                } else {
                    format!("Request error: {e}")
                };
                error!(url, error = %error, "webhook test failed");

                WebhookTestOutcome {
                    success: false,
                    status_code: None,
                    response_time_ms,
                    error: Some(error),
                }
            },
        }
    }

    async fn enabled_webhooks(&self) -> Result<Vec<Webhook>, sqlx::Error> {
        sqlx::query_as::<_, Webhook>(
            r#"
            SELECT id, url, event_types, is_enabled, created_at, updated_at
            FROM webhooks
            WHERE is_enabled = TRUE
            "#,
        )
        .fetch_all(&self.db)
        .await
    }
}

/// One delivery attempt. Logs the outcome and swallows every failure.
async fn deliver(client: reqwest::Client, webhook: Webhook, event_type: &str, payload: Value) {
    let envelope = build_envelope(event_type, &payload);

    match client.post(&webhook.url).json(&envelope).send().await {
        Ok(response) if response.status().is_success() => {
            info!(
                webhook_id = %webhook.id,
                url = %webhook.url,
                event_type,
                status = response.status().as_u16(),
                "webhook delivered"
            );
        },
        Ok(response) => {
            warn!(
                webhook_id = %webhook.id,
                url = %webhook.url,
                event_type,
                status = response.status().as_u16(),
                "webhook delivery rejected"
            );
        },
        Err(e) if e.is_timeout() => {
            error!(webhook_id = %webhook.id, url = %webhook.url, event_type, "webhook delivery timeout");
        },
        Err(e) => {
            error!(webhook_id = %webhook.id, url = %webhook.url, event_type, error = %e, "webhook delivery error");
        },
    }
}

/// Envelope: `{event, timestamp, ...payload}`; payload keys win on clash
fn build_envelope(event_type: &str, payload: &Value) -> Value {
    let mut envelope = serde_json::Map::new();
    envelope.insert("event".to_string(), json!(event_type));
    envelope.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    if let Some(fields) = payload.as_object() {
        for (key, value) in fields {
            envelope.insert(key.clone(), value.clone());
        }
    }
    Value::Object(envelope)
}
