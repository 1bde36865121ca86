//! Catalog ingestion
//!
//! Streaming decode of gzip-compressed CSV catalogs into batched, idempotent
//! product upserts, orchestrated per upload job:
//!
//! - `decoder`: lazy gzip+CSV row stream with a required-column contract
//! - `normalize`: raw row canonicalization (or skip)
//! - `batch`: within-batch dedup and the atomic multi-row upsert
//! - `pipeline`: per-job state machine wiring decode → normalize → batch →
//!   upsert → progress-report, plus artifact cleanup
//! - `error`: the job-fatal error taxonomy with user-safe messages

pub mod batch;
pub mod decoder;
pub mod error;
pub mod normalize;
pub mod pipeline;

pub use error::IngestError;
pub use normalize::NewProduct;
pub use pipeline::{run_upload_job, UploadJob};
