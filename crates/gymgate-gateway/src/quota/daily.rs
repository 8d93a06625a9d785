use std::sync::Arc;

use gymgate_core::error::{GateError, Result};
use gymgate_core::Clock;

use crate::store::CounterStore;

use super::StoreGuard;

/// Per-client daily allowance kept in the store (`scope:client:YYYY-MM-DD`),
/// so it survives restarts and is shared by every gateway instance.
pub struct DailyQuota {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    scope: &'static str,
    limit: u32,
    guard: StoreGuard,
}

impl DailyQuota {
    pub fn new(
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
        scope: &'static str,
        limit: u32,
        guard: StoreGuard,
    ) -> Self {
        Self {
            store,
            clock,
            scope,
            limit,
            guard,
        }
    }

    /// Count one use for `client`; returns what is left for today (UTC).
    pub async fn hit(&self, client: &str) -> Result<u32> {
        let day = self.clock.now().date_naive();
        let key = format!("{}:{client}:{day}", self.scope);

        let used = self
            .guard
            .once("increment", self.store.increment(&key, day))
            .await?;

        if used > u64::from(self.limit) {
            tracing::info!(
                scope = self.scope,
                client,
                used,
                limit = self.limit,
                "daily limit reached"
            );
            return Err(GateError::RateLimited);
        }
        Ok(self.limit - used as u32)
    }
}
