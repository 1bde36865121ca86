//! Webhook management feature
//!
//! CRUD for registered endpoints, the synchronous test endpoint, and the
//! event simulation triggers. Delivery itself lives in [`crate::dispatch`];
//! this feature only owns the registration surface.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;
pub mod validation;

pub use routes::{simulation_routes, webhooks_routes, WebhooksState};
pub use types::Webhook;
