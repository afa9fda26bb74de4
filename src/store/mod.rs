//! File-backed record store
//!
//! Every record lives in a single JSON blob that is read in full on each
//! call and rewritten in full on each append. A missing or unreadable blob
//! is an empty store.

pub mod record;

pub use record::{Criteria, Record, StoreError};

use record::Criterion;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to the record blob.
///
/// Clones share one lock, so appends from concurrent connections are
/// serialized and numbers are never handed out twice.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores a new record and returns it.
    ///
    /// The new number is one past the largest stored number, or 1 for an
    /// empty store.
    pub async fn append(&self, first: &str, last: &str) -> Result<Record, StoreError> {
        let _guard = self.lock.lock().await;

        let mut records = self.load().await;
        let number = records.iter().map(|r| r.number).max().unwrap_or(0) + 1;
        let record = Record {
            number,
            first: first.to_string(),
            last: last.to_string(),
        };
        records.push(record.clone());

        self.rewrite(&records).await?;
        tracing::debug!(number, path = %self.path.display(), "Record appended");
        Ok(record)
    }

    /// Returns the stored records matching every criterion, in stored order.
    ///
    /// `None` or an empty mapping selects everything.
    pub async fn query(&self, criteria: Option<&Criteria>) -> Result<Vec<Record>, StoreError> {
        let filters = match criteria {
            Some(criteria) => Criterion::from_criteria(criteria)?,
            None => Vec::new(),
        };

        let records = {
            let _guard = self.lock.lock().await;
            self.load().await
        };

        Ok(records
            .into_iter()
            .filter(|record| filters.iter().all(|f| f.matches(record)))
            .collect())
    }

    async fn load(&self) -> Vec<Record> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Record blob unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Record blob corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    async fn rewrite(&self, records: &[Record]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(records)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
