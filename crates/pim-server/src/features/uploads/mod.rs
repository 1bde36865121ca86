//! Catalog upload feature
//!
//! Accepts a gzip-compressed CSV, stages it to disk, and schedules the
//! ingestion pipeline as a detached task. The request returns as soon as the
//! artifact is staged; all content-level failures surface later through the
//! progress channel only.

pub mod routes;

pub use routes::{uploads_routes, UploadsState};
