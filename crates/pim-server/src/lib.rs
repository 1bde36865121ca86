//! PIM Server Library
//!
//! HTTP backend for the product information management system.
//!
//! # Overview
//!
//! The server ingests gzip-compressed CSV product catalogs asynchronously,
//! upserts the records into PostgreSQL in atomic batches, and pushes live
//! progress to websocket observers. A second subsystem fans domain events out
//! to externally registered webhook endpoints.
//!
//! - **Ingestion** (`ingest`): streaming gzip+CSV decode, row normalization,
//!   batched idempotent upserts, per-job orchestration
//! - **Progress** (`progress`): per-job publish/subscribe registry feeding
//!   the websocket progress channel
//! - **Dispatch** (`dispatch`): webhook delivery with isolated, detached
//!   per-endpoint attempts
//! - **Features** (`features`): vertical HTTP slices (uploads, products,
//!   webhooks, progress channel)
//!
//! # Architecture
//!
//! Features follow a CQRS layout: each slice owns its `commands/` and
//! `queries/` with per-operation input structs, validation, and error enums;
//! `routes.rs` translates outcomes to HTTP. Long-running work never executes
//! on the request path — uploads return `202 Accepted` and the pipeline runs
//! as a detached task whose outcome is observable only through the progress
//! channel.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework (multipart uploads, websockets)
//! - **SQLx**: PostgreSQL pool and migrations
//! - **Tower**: middleware (tracing, CORS, compression)

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod progress;
pub mod tasks;

// Re-export commonly used types
pub use error::{AppError, AppResult};
