//! JSON file-backed record store.

use super::memory::RecordLog;
use super::RecordStore;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::filter::RecordFilter;
use crate::types::{NewRegistration, StoredRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Data version for schema migrations.
const DATA_VERSION: u32 = 1;

/// On-disk layout of the store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Schema version for migrations.
    version: u32,
    /// Records in creation order.
    log: RecordLog,
}

/// Record store persisting the full log to a JSON file after every write.
pub struct FileRecordStore {
    log: RwLock<RecordLog>,
    storage_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileRecordStore {
    /// Open the store at `storage_path`, loading existing records if present.
    pub async fn open(storage_path: PathBuf) -> Result<Self, StoreError> {
        Self::open_with_clock(storage_path, Arc::new(SystemClock)).await
    }

    /// Open the store stamping new records with `clock`.
    pub async fn open_with_clock(
        storage_path: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let log = load(&storage_path).await?;
        Ok(Self {
            log: RwLock::new(log),
            storage_path,
            clock,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Write the log atomically using temp file + rename.
    async fn save(&self, log: &RecordLog) -> Result<(), StoreError> {
        let data = StoreData {
            version: DATA_VERSION,
            log: log.clone(),
        };
        let bytes = serde_json::to_vec(&data)?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved {} records ({} bytes) to {:?}",
            log.count(),
            bytes.len(),
            self.storage_path
        );
        Ok(())
    }
}

/// Read the log from disk. A missing file is an empty log.
async fn load(path: &Path) -> Result<RecordLog, StoreError> {
    if !fs::try_exists(path).await? {
        info!("Store file not found at {:?}, starting with empty store", path);
        return Ok(RecordLog::new());
    }

    let bytes = fs::read(path).await?;
    let data: StoreData = serde_json::from_slice(&bytes)?;

    info!(
        "Loaded {} records (version {}) from {:?}",
        data.log.count(),
        data.version,
        path
    );
    Ok(data.log)
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn create(&self, registration: NewRegistration) -> Result<StoredRecord, StoreError> {
        let mut log = self.log.write().await;
        let stored = log.append(registration, self.clock.now());

        if let Err(e) = self.save(&log).await {
            error!(id = stored.id, "Failed to persist record, rolling back: {}", e);
            log.pop();
            return Err(e);
        }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn registration(name: &str) -> NewRegistration {
        NewRegistration::new("3", name, "9000000000", "198.51.100.4")
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::open(dir.path().join("records.json"))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");
        let now = Utc.with_ymd_and_hms(2024, 1, 16, 3, 35, 3).unwrap();

        {
            let store = FileRecordStore::open_with_clock(path.clone(), Arc::new(FixedClock(now)))
                .await
                .unwrap();
            store.create(registration("Asha")).await.unwrap();
            store.create(registration("Ravi")).await.unwrap();
        }

        let reopened = FileRecordStore::open(path.clone()).await.unwrap();
        let records = reopened.find_all(&RecordFilter::All).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.name, "Asha");
        assert_eq!(records[0].record.registration_time, "16/1/2024, 9:05:03 am");
        assert!(!path.with_extension("tmp").exists());

        // Ids continue after reopen
        let next = reopened.create(registration("Meera")).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = FileRecordStore::open(path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("records.json");
        let store = FileRecordStore::open(path.clone()).await.unwrap();
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        let result = store.create(registration("Asha")).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
