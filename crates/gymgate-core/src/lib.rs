//! gymgate core: principals, session tokens, clock and the error surface.
//!
//! This crate carries no HTTP or runtime dependencies so the token logic can
//! be reused by CLIs and test harnesses as well as the gateway.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Token verification
//! runs on attacker-controlled bytes and must always return a `Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod error;
pub mod principal;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthFailure, AuthFailureReason, ClientCode, GateError, Result};
pub use principal::{Principal, Role};
pub use token::{TokenService, SESSION_TTL_SECS};
