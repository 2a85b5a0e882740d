//! Date-windowed record queries and CSV export.
//!
//! Exports are written to a uniquely named temporary file which is owned by
//! the response body stream and removed when that stream is dropped, whether
//! the transfer finished or not.

use crate::error::ApiError;
use axum::body::Bytes;
use futures::Stream;
use registration_store::{RecordFilter, RecordStore, StoredRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tempfile::TempPath;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

/// Column titles, in output order.
pub const CSV_HEADER: [&str; 3] = ["Table Number", "Name", "Phone Number"];

/// Label used in file names when no date was requested.
const ALL_RECORDS_LABEL: &str = "all";

/// Queries and exports registrations by requested date.
#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn RecordStore>,
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(store: Arc<dyn RecordStore>, export_dir: PathBuf) -> Self {
        Self { store, export_dir }
    }

    /// Records for the requested date, or all records when `date` is absent.
    ///
    /// A date selects records registered on the *following* day.
    pub async fn query(&self, date: Option<&str>) -> Result<Vec<StoredRecord>, ApiError> {
        let filter = RecordFilter::for_requested_date(date);
        let records = self.store.find_all(&filter).await.map_err(|e| {
            error!("Error retrieving records: {}", e);
            ApiError::Storage(e)
        })?;

        debug!(?filter, count = records.len(), "Records retrieved");
        Ok(records)
    }

    /// The `n` most recently created records.
    pub async fn latest(&self, n: usize) -> Result<Vec<StoredRecord>, ApiError> {
        self.store.find_latest(n).await.map_err(|e| {
            error!("Error retrieving latest records: {}", e);
            ApiError::Storage(e)
        })
    }

    /// Render the query result as CSV into a temporary file.
    pub async fn export_csv(&self, date: Option<&str>) -> Result<ExportArtifact, ApiError> {
        let records = self.query(date).await?;
        let csv = render_csv(&records)?;

        let label = date_label(date);
        let prefix = format!("data_{}_", label);
        let dir = self.export_dir.clone();

        let path = tokio::task::spawn_blocking(move || -> std::io::Result<TempPath> {
            std::fs::create_dir_all(&dir)?;
            let mut file = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".csv")
                .tempfile_in(&dir)?;
            file.write_all(&csv)?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await
        .map_err(|e| ApiError::FileIo(format!("Export task failed: {}", e)))?
        .map_err(|e| {
            error!("Error writing export file: {}", e);
            ApiError::from(e)
        })?;

        // On failure `path` is dropped here, which removes the file.
        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            error!("Error opening export file: {}", e);
            ApiError::from(e)
        })?;

        info!(count = records.len(), path = ?&*path, "Export file written");

        Ok(ExportArtifact {
            file,
            path,
            download_name: format!("data_{}.csv", label),
        })
    }
}

/// Render records as CSV with a header row.
pub fn render_csv(records: &[StoredRecord]) -> Result<Vec<u8>, ApiError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for stored in records {
        wtr.write_record([
            &stored.record.table_number,
            &stored.record.name,
            &stored.record.phone_number,
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| ApiError::FileIo(format!("CSV flush error: {}", e)))
}

/// File-name-safe form of the requested date.
fn date_label(date: Option<&str>) -> String {
    let label: String = date
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if label.is_empty() {
        ALL_RECORDS_LABEL.to_string()
    } else {
        label
    }
}

/// A written export file, deleted once dropped.
pub struct ExportArtifact {
    file: tokio::fs::File,
    path: TempPath,
    download_name: String,
}

impl ExportArtifact {
    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name offered to the client.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Stream the file contents. The file is removed when the stream is dropped.
    pub fn into_stream(self) -> ExportStream {
        ExportStream {
            inner: ReaderStream::new(self.file),
            path: Some(self.path),
        }
    }
}

/// Body stream over an export file that cleans the file up on drop.
pub struct ExportStream {
    inner: ReaderStream<tokio::fs::File>,
    path: Option<TempPath>,
}

impl Stream for ExportStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for ExportStream {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let removed_path = path.to_path_buf();
            match path.close() {
                Ok(()) => debug!(path = ?removed_path, "Export file removed"),
                Err(e) => error!(path = ?removed_path, "Failed to remove export file: {}", e),
            }
        }
    }
}
