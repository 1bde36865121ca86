//! Progress channel feature
//!
//! The per-job websocket endpoint observers connect to. Subscribes the
//! socket to the job on upgrade and forwards progress messages as JSON.

pub mod routes;

pub use routes::ws_routes;
