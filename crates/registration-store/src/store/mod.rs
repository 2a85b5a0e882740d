//! Record store trait and backends.

mod file;
mod memory;

pub use file::FileRecordStore;
pub use memory::{MemoryRecordStore, RecordLog};

use crate::error::StoreError;
use crate::filter::RecordFilter;
use crate::types::{NewRegistration, StoredRecord};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

/// Append-only registration storage.
///
/// `create` stamps the registration time itself. Nothing a caller passes can
/// set it, and there is no update or delete.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new registration.
    async fn create(&self, registration: NewRegistration) -> Result<StoredRecord, StoreError>;

    /// All records passing `filter`, in creation order.
    async fn find_all(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, StoreError>;

    /// Up to `n` records, newest first.
    async fn find_latest(&self, n: usize) -> Result<Vec<StoredRecord>, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Storage backend selected at startup.
pub enum Store {
    /// JSON file persistence
    File(FileRecordStore),
    /// In-memory only (no persistence)
    Memory(MemoryRecordStore),
}

impl Store {
    /// Open a file-backed store, or a memory store when `persist` is off.
    pub async fn open(persist: bool, path: PathBuf) -> Result<Self, StoreError> {
        if persist {
            info!("Using file-backed record store at {:?}", path);
            Ok(Store::File(FileRecordStore::open(path).await?))
        } else {
            warn!("Persistence disabled, using in-memory storage (data will be lost on restart)");
            Ok(Store::Memory(MemoryRecordStore::new()))
        }
    }

    /// Force memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryRecordStore::new())
    }

    fn backend(&self) -> &dyn RecordStore {
        match self {
            Store::File(s) => s,
            Store::Memory(s) => s,
        }
    }
}

#[async_trait]
impl RecordStore for Store {
    async fn create(&self, registration: NewRegistration) -> Result<StoredRecord, StoreError> {
        self.backend().create(registration).await
    }

    async fn find_all(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, StoreError> {
        self.backend().find_all(filter).await
    }

    async fn find_latest(&self, n: usize) -> Result<Vec<StoredRecord>, StoreError> {
        self.backend().find_latest(n).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.backend().count().await
    }
}
