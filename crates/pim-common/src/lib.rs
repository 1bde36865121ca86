//! PIM Common Library
//!
//! Shared error handling and logging setup for the PIM workspace members.
//!
//! # Example
//!
//! ```no_run
//! use pim_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> pim_common::Result<()> {
//!     let config = LogConfig::from_env();
//!     init_logging(&config)?;
//!     tracing::info!("service starting");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{PimError, Result};
