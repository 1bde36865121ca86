//! Per-job progress broadcasting
//!
//! Jobs publish status messages; websocket observers subscribe per job id.
//! The registry fans each published message out to a point-in-time snapshot
//! of the job's subscribers and prunes handles whose channel has closed.

pub mod message;
pub mod registry;

pub use message::ProgressMessage;
pub use registry::{ProgressRegistry, ProgressSubscription};
