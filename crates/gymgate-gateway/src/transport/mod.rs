//! HTTP transport glue.
//!
//! The gate middleware that authorizes every request, and the extractor
//! handlers use to read the principal it attached.

pub mod extract;
pub mod gate;

pub use extract::Session;
