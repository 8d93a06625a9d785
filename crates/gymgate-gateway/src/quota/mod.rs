//! Resource ceilings enforced against the backing store.
//!
//! - `MemberQuota`: reject creates once the member count reaches the ceiling.
//! - `NotificationWindow`: write, then evict the oldest beyond the retention.
//! - `DailyQuota`: per-client daily allowance on a store counter.
//!
//! Every store call is bounded by a timeout. Count reads are retried once
//! after a short backoff; writes are not retried. Whatever still fails is
//! reported as `StoreUnavailable` and the write is denied.

pub mod daily;
pub mod member;
pub mod notification;

use std::future::Future;

use tokio::time::{sleep, timeout, Duration};

use gymgate_core::error::{GateError, Result};

use crate::config::QuotaSection;

pub use daily::DailyQuota;
pub use member::MemberQuota;
pub use notification::NotificationWindow;

#[derive(Debug, Clone, Copy)]
pub struct StoreGuard {
    timeout: Duration,
    backoff: Duration,
}

impl StoreGuard {
    pub fn new(timeout: Duration, backoff: Duration) -> Self {
        Self { timeout, backoff }
    }

    pub fn from_config(q: &QuotaSection) -> Self {
        Self::new(
            Duration::from_millis(q.store_timeout_ms),
            Duration::from_millis(q.retry_backoff_ms),
        )
    }

    /// One bounded store call.
    pub async fn once<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "store call failed");
                Err(fail_closed(e))
            }
            Err(_) => {
                tracing::warn!(
                    op,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(GateError::StoreUnavailable(format!("{op} timed out")))
            }
        }
    }

    /// Bounded read, retried once after the backoff.
    pub async fn read<T, F, Fut>(&self, op: &'static str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.once(op, f()).await {
            Ok(v) => Ok(v),
            Err(GateError::StoreUnavailable(_)) => {
                sleep(self.backoff).await;
                self.once(op, f()).await
            }
            Err(e) => Err(e),
        }
    }
}

fn fail_closed(e: GateError) -> GateError {
    match e {
        GateError::StoreUnavailable(_) => e,
        other => GateError::StoreUnavailable(other.to_string()),
    }
}
