//! API infrastructure
//!
//! Response envelopes shared by every feature route.

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
