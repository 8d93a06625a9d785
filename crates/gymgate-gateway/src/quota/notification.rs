use std::sync::Arc;

use gymgate_core::error::Result;

use crate::store::{NewNotification, Notification, NotificationStore};

use super::StoreGuard;

/// Bounded notification log. New events are never rejected; the oldest are
/// evicted once the log holds more than `retention` entries.
pub struct NotificationWindow {
    store: Arc<dyn NotificationStore>,
    retention: u64,
    guard: StoreGuard,
}

impl NotificationWindow {
    pub fn new(store: Arc<dyn NotificationStore>, retention: u64, guard: StoreGuard) -> Self {
        Self {
            store,
            retention,
            guard,
        }
    }

    pub async fn record_and_trim(&self, event: NewNotification) -> Result<Notification> {
        let recorded = self
            .guard
            .once("insert_notification", self.store.insert_notification(event))
            .await?;

        let count = self
            .guard
            .read("count_notifications", || self.store.count_notifications())
            .await?;

        if count > self.retention {
            let excess = count - self.retention;
            let removed = self
                .guard
                .once(
                    "delete_oldest_notifications",
                    self.store.delete_oldest_notifications(excess),
                )
                .await?;
            tracing::debug!(count, removed, retention = self.retention, "notification log trimmed");
        }

        Ok(recorded)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<Notification>> {
        self.guard
            .read("list_notifications", || self.store.list_notifications(limit))
            .await
    }
}
