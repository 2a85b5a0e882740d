//! In-memory record log and store.

use super::RecordStore;
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::error::StoreError;
use crate::filter::RecordFilter;
use crate::types::{NewRegistration, RegistrationRecord, StoredRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Append-only sequence of records in creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordLog {
    records: Vec<StoredRecord>,
}

impl RecordLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a registration stamped at `now`.
    pub fn append(&mut self, registration: NewRegistration, now: DateTime<Utc>) -> StoredRecord {
        let id = self.records.last().map(|r| r.id + 1).unwrap_or(1);

        let stored = StoredRecord {
            id,
            record: RegistrationRecord {
                table_number: registration.table_number,
                name: registration.name,
                phone_number: registration.phone_number,
                registration_time: format_timestamp(now),
                ip_address: registration.ip_address,
            },
            created_at: now,
        };

        self.records.push(stored.clone());
        stored
    }

    /// Drop the most recent record.
    pub fn pop(&mut self) -> Option<StoredRecord> {
        self.records.pop()
    }

    /// Records passing `filter`, oldest first.
    pub fn filtered(&self, filter: &RecordFilter) -> Vec<StoredRecord> {
        self.records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Up to `n` records, newest first.
    pub fn latest(&self, n: usize) -> Vec<StoredRecord> {
        if n == 1 {
            return self
                .records
                .iter()
                .max_by_key(|r| (r.created_at, r.id))
                .cloned()
                .into_iter()
                .collect();
        }

        let mut latest: Vec<&StoredRecord> = self.records.iter().collect();
        latest.sort_unstable_by_key(|r| std::cmp::Reverse((r.created_at, r.id)));
        latest.into_iter().take(n).cloned().collect()
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// Non-persistent record store.
pub struct MemoryRecordStore {
    log: RwLock<RecordLog>,
    clock: Arc<dyn Clock>,
}

impl MemoryRecordStore {
    /// Create an empty store using the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamping records with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: RwLock::new(RecordLog::new()),
            clock,
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, registration: NewRegistration) -> Result<StoredRecord, StoreError> {
        let mut log = self.log.write().await;
        let stored = log.append(registration, self.clock.now());
        debug!(id = stored.id, "Memory store: record appended");
        Ok(stored)
    }

    async fn find_all(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.log.read().await.filtered(filter))
    }

    async fn find_latest(&self, n: usize) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.log.read().await.latest(n))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.log.read().await.count())
    }
}
