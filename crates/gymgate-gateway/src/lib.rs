//! gymgate gateway library entry.
//!
//! Wires config, route policy, session resolution, token verification and
//! quota enforcement into an axum service. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ops;
pub mod policy;
pub mod quota;
pub mod router;
pub mod session;
pub mod store;
pub mod transport;
