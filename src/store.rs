use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewRecord, RecordKind};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can persist a submission and hand back the generated id.
///
/// Handles are constructed once at startup and cloned into the router state.
pub trait Store: Clone + Send + Sync + 'static {
    fn create(&self, record: NewRecord) -> impl Future<Output = Result<Uuid, StoreError>> + Send;
}

/// One stored submission. `created_at` orders [`MemoryStore::recent`].
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub id: Uuid,
    pub record: NewRecord,
    pub created_at: DateTime<Utc>,
}

/// In-process store used by tests and `serve --in-memory`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<MemoryEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.snapshot()
            .iter()
            .filter(|entry| entry.record.kind() == kind)
            .count()
    }

    pub fn get(&self, id: Uuid) -> Option<NewRecord> {
        self.snapshot()
            .into_iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.record)
    }

    /// Newest first, at most `limit` entries of one kind.
    pub fn recent(&self, kind: RecordKind, limit: usize) -> Vec<MemoryEntry> {
        let mut entries: Vec<MemoryEntry> = self
            .snapshot()
            .into_iter()
            .rev()
            .filter(|entry| entry.record.kind() == kind)
            .collect();

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        entries
    }

    fn snapshot(&self) -> Vec<MemoryEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Store for MemoryStore {
    async fn create(&self, record: NewRecord) -> Result<Uuid, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let id = Uuid::new_v4();
        entries.push(MemoryEntry {
            id,
            record,
            created_at: Utc::now(),
        });

        Ok(id)
    }
}
