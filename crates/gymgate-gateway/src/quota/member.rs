use std::sync::Arc;

use gymgate_core::error::{GateError, Result};

use crate::config::CapMode;
use crate::store::{MemberRecord, MemberStore, NewMember};

use super::StoreGuard;

/// Member-count ceiling.
///
/// In `Soft` mode the count and the insert are two round-trips, so
/// concurrent creates can overshoot the ceiling by a few records. `Hard` mode
/// delegates to the store's atomic conditional insert.
pub struct MemberQuota {
    store: Arc<dyn MemberStore>,
    ceiling: u64,
    mode: CapMode,
    guard: StoreGuard,
}

impl MemberQuota {
    pub fn new(
        store: Arc<dyn MemberStore>,
        ceiling: u64,
        mode: CapMode,
        guard: StoreGuard,
    ) -> Self {
        Self {
            store,
            ceiling,
            mode,
            guard,
        }
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    fn exceeded(&self) -> GateError {
        GateError::QuotaExceeded(format!(
            "member limit reached: at most {} members allowed",
            self.ceiling
        ))
    }

    /// Ok when one more member fits under the ceiling right now.
    pub async fn try_reserve(&self) -> Result<()> {
        let count = self
            .guard
            .read("count_members", || self.store.count_members())
            .await?;
        if count >= self.ceiling {
            tracing::info!(count, ceiling = self.ceiling, "member create rejected");
            return Err(self.exceeded());
        }
        Ok(())
    }

    /// Reserve and persist one member.
    pub async fn create(&self, new: NewMember) -> Result<MemberRecord> {
        match self.mode {
            CapMode::Soft => {
                self.try_reserve().await?;
                self.guard
                    .once("insert_member", self.store.insert_member(new))
                    .await
            }
            CapMode::Hard => self
                .guard
                .once(
                    "insert_member_if_below",
                    self.store.insert_member_if_below(new, self.ceiling),
                )
                .await?
                .ok_or_else(|| self.exceeded()),
        }
    }
}
