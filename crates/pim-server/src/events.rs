//! Domain event types
//!
//! The closed set of event type names webhooks may subscribe to, plus the
//! demo payloads used by the simulation endpoints.

use serde_json::{json, Value};

pub const USER_CREATED: &str = "user.created";
pub const USER_MODIFIED: &str = "user.modified";
pub const PAYMENT_COMPLETED: &str = "payment.completed";

/// All event types a webhook may subscribe to
pub const AVAILABLE_EVENTS: [&str; 3] = [USER_CREATED, USER_MODIFIED, PAYMENT_COMPLETED];

/// Whether `event_type` is a known event type name
pub fn is_known_event(event_type: &str) -> bool {
    AVAILABLE_EVENTS.contains(&event_type)
}

/// Demo payload for a simulated event trigger
pub fn demo_payload(event_type: &str) -> Option<Value> {
    match event_type {
        USER_CREATED => Some(json!({
            "user_id": 123,
            "email": "demo@example.com",
        })),
        USER_MODIFIED => Some(json!({
            "user_id": 123,
            "email": "updated@example.com",
            "changes": ["email", "name"],
        })),
        PAYMENT_COMPLETED => Some(json!({
            "payment_id": 777,
            "status": "success",
        })),
        _ => None,
    }
}
