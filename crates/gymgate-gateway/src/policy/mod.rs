//! Route authorization policy.
//!
//! Compiles the configured prefix table into a sorted rule list at startup and
//! answers one decision per request path before any handler runs.

pub mod engine;
pub mod table;

pub use engine::{Decision, RouteMatch, RoutePolicy};
