use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{InsertAck, LogStore, StoreError};
use crate::record::LogRecord;

/// In-process store for tests and dry runs. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<LogRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every insert fails, like a server nobody is listening on.
    pub fn unreachable() -> Self {
        let store = Self::new();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn records(&self) -> Vec<LogRecord> {
        self.records.lock().await.clone()
    }
}

impl LogStore for MemoryStore {
    async fn insert_one(&self, record: &LogRecord) -> Result<InsertAck, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        let mut records = self.records.lock().await;
        records.push(record.clone());
        Ok(InsertAck {
            id: Some(records.len().to_string()),
        })
    }

    fn namespace(&self) -> String {
        "memory.logs".to_string()
    }
}
