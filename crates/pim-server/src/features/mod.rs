//! Feature modules implementing the PIM API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **products**: catalog listing and single-product upsert
//! - **uploads**: catalog upload acceptance and pipeline scheduling
//! - **webhooks**: webhook CRUD, synchronous testing, event simulation
//! - **progress**: the per-job websocket progress channel
//!
//! # Architecture
//!
//! Write operations live under `commands/`, reads under `queries/`; each
//! operation file owns its input struct, validation, and error enum, and
//! exposes a `handle()` invoked directly by the feature's `routes.rs`.

pub mod products;
pub mod progress;
pub mod uploads;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;

use crate::config::IngestConfig;
use crate::dispatch::WebhookDispatcher;
use crate::progress::ProgressRegistry;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Per-job progress broadcaster
    pub progress: Arc<ProgressRegistry>,
    /// Webhook delivery service
    pub dispatcher: WebhookDispatcher,
    /// Ingestion settings (batch size, upload staging directory)
    pub ingest: IngestConfig,
}

/// Creates the `/api` router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/products", products::products_routes().with_state(state.db.clone()))
        .nest(
            "/webhooks",
            webhooks::webhooks_routes().with_state(webhooks::WebhooksState {
                db: state.db.clone(),
                dispatcher: state.dispatcher.clone(),
            }),
        )
        .nest(
            "/upload",
            uploads::uploads_routes().with_state(uploads::UploadsState {
                db: state.db.clone(),
                progress: state.progress.clone(),
                ingest: state.ingest.clone(),
            }),
        )
}
