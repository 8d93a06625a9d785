//! In-memory store used for development and tests.
//!
//! Each collection sits behind its own async mutex, so count-then-insert from
//! two handlers can interleave exactly as it would against a remote store,
//! while `insert_member_if_below` holds the lock across check and insert.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;

use gymgate_core::error::Result;
use gymgate_core::Clock;

use super::{
    CounterStore, MemberPatch, MemberRecord, MemberStore, NewMember, NewNotification,
    Notification, NotificationStore,
};

pub struct InMemoryStore {
    clock: Arc<dyn Clock>,
    members: Mutex<BTreeMap<u64, MemberRecord>>,
    next_member_id: AtomicU64,
    notifications: Mutex<VecDeque<Notification>>,
    next_seq: AtomicU64,
    counters: DashMap<String, (NaiveDate, u64)>,
    newest_bucket: std::sync::Mutex<Option<NaiveDate>>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            members: Mutex::new(BTreeMap::new()),
            next_member_id: AtomicU64::new(1),
            notifications: Mutex::new(VecDeque::new()),
            next_seq: AtomicU64::new(1),
            counters: DashMap::new(),
            newest_bucket: std::sync::Mutex::new(None),
        }
    }

    fn build_member(&self, new: NewMember) -> MemberRecord {
        MemberRecord {
            id: self.next_member_id.fetch_add(1, Ordering::Relaxed),
            name: new.name,
            email: new.email,
            trainer_id: new.trainer_id,
            created_at: self.clock.now(),
        }
    }

    /// Drop counters of past buckets once a newer bucket shows up.
    fn roll_buckets(&self, bucket: NaiveDate) {
        let rolled = match self.newest_bucket.lock() {
            Ok(mut g) => match *g {
                Some(cur) if cur >= bucket => false,
                _ => {
                    *g = Some(bucket);
                    true
                }
            },
            Err(_) => false,
        };
        if rolled {
            self.counters.retain(|_, (b, _)| *b >= bucket);
        }
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn count_members(&self) -> Result<u64> {
        Ok(self.members.lock().await.len() as u64)
    }

    async fn insert_member(&self, new: NewMember) -> Result<MemberRecord> {
        let rec = self.build_member(new);
        self.members.lock().await.insert(rec.id, rec.clone());
        Ok(rec)
    }

    async fn insert_member_if_below(
        &self,
        new: NewMember,
        ceiling: u64,
    ) -> Result<Option<MemberRecord>> {
        let mut g = self.members.lock().await;
        if g.len() as u64 >= ceiling {
            return Ok(None);
        }
        let rec = self.build_member(new);
        g.insert(rec.id, rec.clone());
        Ok(Some(rec))
    }

    async fn update_member(&self, id: u64, patch: MemberPatch) -> Result<Option<MemberRecord>> {
        let mut g = self.members.lock().await;
        let Some(rec) = g.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            rec.name = name;
        }
        if patch.email.is_some() {
            rec.email = patch.email;
        }
        if patch.trainer_id.is_some() {
            rec.trainer_id = patch.trainer_id;
        }
        Ok(Some(rec.clone()))
    }

    async fn delete_member(&self, id: u64) -> Result<Option<MemberRecord>> {
        Ok(self.members.lock().await.remove(&id))
    }

    async fn list_members(&self) -> Result<Vec<MemberRecord>> {
        Ok(self.members.lock().await.values().cloned().collect())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert_notification(&self, new: NewNotification) -> Result<Notification> {
        let mut g = self.notifications.lock().await;
        // Allocate under the lock so seq order equals queue order.
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let n = Notification {
            id: seq,
            seq,
            kind: new.kind,
            message: new.message,
            created_at: self.clock.now(),
        };
        g.push_back(n.clone());
        Ok(n)
    }

    async fn count_notifications(&self) -> Result<u64> {
        Ok(self.notifications.lock().await.len() as u64)
    }

    async fn delete_oldest_notifications(&self, n: u64) -> Result<u64> {
        let mut g = self.notifications.lock().await;
        let take = (n as usize).min(g.len());
        g.drain(..take);
        Ok(take as u64)
    }

    async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>> {
        let g = self.notifications.lock().await;
        Ok(g.iter().rev().take(limit).cloned().collect())
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn increment(&self, key: &str, bucket: NaiveDate) -> Result<u64> {
        self.roll_buckets(bucket);
        let mut e = self.counters.entry(key.to_string()).or_insert((bucket, 0));
        if e.0 != bucket {
            *e = (bucket, 0);
        }
        e.1 += 1;
        Ok(e.1)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;
    use gymgate_core::SystemClock;

    fn member(name: &str) -> NewMember {
        NewMember {
            name: name.into(),
            email: None,
            trainer_id: None,
        }
    }

    #[tokio::test]
    async fn conditional_insert_respects_ceiling() {
        let s = InMemoryStore::new(Arc::new(SystemClock));
        assert!(s.insert_member_if_below(member("a"), 1).await.unwrap().is_some());
        assert!(s.insert_member_if_below(member("b"), 1).await.unwrap().is_none());
        assert_eq!(s.count_members().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn oldest_notifications_go_first() {
        let s = InMemoryStore::new(Arc::new(SystemClock));
        for i in 0..5 {
            s.insert_notification(NewNotification::new(
                super::super::NotificationKind::MemberAdded,
                format!("n{i}"),
            ))
            .await
            .unwrap();
        }
        assert_eq!(s.delete_oldest_notifications(2).await.unwrap(), 2);
        let left = s.list_notifications(10).await.unwrap();
        let msgs: Vec<_> = left.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(msgs, ["n4", "n3", "n2"]);
    }

    #[tokio::test]
    async fn counters_restart_per_bucket() {
        let s = InMemoryStore::new(Arc::new(SystemClock));
        let today = Utc::now().date_naive();
        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(s.increment("k", today).await.unwrap(), 1);
        assert_eq!(s.increment("k", today).await.unwrap(), 2);
        assert_eq!(s.increment("k", tomorrow).await.unwrap(), 1);
        assert_eq!(s.counters.len(), 1);
    }
}
