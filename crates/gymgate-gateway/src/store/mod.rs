//! Backing-store contracts.
//!
//! The store is the only state shared between request handlers (and between
//! gateway instances), so quota checks always go through it. Implementations
//! report connectivity problems as `GateError::StoreUnavailable`.

pub mod accounts;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use gymgate_core::error::Result;

pub use accounts::{hash_password, AccountDirectory, InMemoryAccounts};
pub use memory::InMemoryStore;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub trainer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MemberAdded,
    MemberUpdated,
    MemberDeleted,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    /// Creation order; eviction removes the lowest first.
    pub seq: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn count_members(&self) -> Result<u64>;
    async fn insert_member(&self, new: NewMember) -> Result<MemberRecord>;
    /// Insert only while fewer than `ceiling` members exist, atomically.
    /// `Ok(None)` means the ceiling was reached.
    async fn insert_member_if_below(&self, new: NewMember, ceiling: u64)
        -> Result<Option<MemberRecord>>;
    async fn update_member(&self, id: u64, patch: MemberPatch) -> Result<Option<MemberRecord>>;
    async fn delete_member(&self, id: u64) -> Result<Option<MemberRecord>>;
    async fn list_members(&self) -> Result<Vec<MemberRecord>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, new: NewNotification) -> Result<Notification>;
    async fn count_notifications(&self) -> Result<u64>;
    /// Delete the `n` lowest-`seq` notifications; returns how many went.
    async fn delete_oldest_notifications(&self, n: u64) -> Result<u64>;
    /// Newest first.
    async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>>;
}

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically add one to `key` within `bucket` and return the new value.
    /// A counter seen under an older bucket restarts from zero.
    async fn increment(&self, key: &str, bucket: NaiveDate) -> Result<u64>;
}
