//! Session credentials: token resolution from requests and session cookies.

pub mod cookie;
pub mod resolver;

pub use cookie::CookiePolicy;
pub use resolver::{resolve, Presented, ResolvedToken, TokenSource};
