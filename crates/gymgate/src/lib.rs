//! Top-level facade crate for gymgate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use gymgate_core::*;
}

pub mod gateway {
    pub use gymgate_gateway::*;
}
