//! In-memory lookup double shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use ephemera::application::repos::{LookupError, RecordLookup};
use ephemera::domain::entities::MessageRecord;
use ephemera::domain::key::ContentKey;
use time::{Duration, OffsetDateTime, macros::datetime};

pub const T0: OffsetDateTime = datetime!(2025-03-01 09:00 UTC);

#[derive(Default)]
pub struct MemoryLookup {
    records: Mutex<HashMap<String, MessageRecord>>,
    down: AtomicBool,
    stalled: AtomicBool,
    probes: AtomicUsize,
    find_active_calls: AtomicUsize,
    exists_calls: AtomicUsize,
}

impl MemoryLookup {
    pub fn publish(&self, key: &str, payload: &str, created_at: OffsetDateTime, ttl: Duration) {
        let record = MessageRecord {
            key: ContentKey::new(key),
            payload: payload.to_string(),
            created_at,
            expires_at: created_at + ttl,
        };
        self.records
            .lock()
            .expect("records lock")
            .insert(key.to_string(), record);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Make `probe` hang well past any lookup timeout.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of `find_active` plus `exists` calls.
    pub fn queries(&self) -> usize {
        self.find_active_calls.load(Ordering::SeqCst) + self.exists_calls.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> Result<(), LookupError> {
        if self.down.load(Ordering::SeqCst) {
            Err(LookupError::from_persistence("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordLookup for MemoryLookup {
    async fn find_active(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
    ) -> Result<Option<MessageRecord>, LookupError> {
        self.find_active_calls.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        let records = self.records.lock().expect("records lock");
        Ok(records
            .get(key.as_str())
            .filter(|record| record.is_active_at(now))
            .cloned())
    }

    async fn exists(&self, key: &ContentKey) -> Result<bool, LookupError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        Ok(self
            .records
            .lock()
            .expect("records lock")
            .contains_key(key.as_str()))
    }

    async fn probe(&self) -> Result<(), LookupError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.stalled.load(Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_secs(3_600)).await;
        }
        self.check_up()
    }
}
