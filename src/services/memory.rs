use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::storage::{StorageError, StorageService};

/// In-process store. Collections listed through [`MemoryStorage::failing_on`]
/// reject every save.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<(String, String), Value>>,
    failing: Mutex<HashSet<String>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, collection: &str) -> Self {
        self.failing.lock().insert(collection.to_string());
        self
    }

    pub fn set_failing(&self, collection: &str, failing: bool) {
        let mut guard = self.failing.lock();
        if failing {
            guard.insert(collection.to_string());
        } else {
            guard.remove(collection);
        }
    }

    pub fn insert(&self, collection: &str, project_id: &str, document: Value) {
        self.documents
            .lock()
            .insert((project_id.to_string(), collection.to_string()), document);
    }

    pub fn document(&self, collection: &str, project_id: &str) -> Option<Value> {
        self.documents
            .lock()
            .get(&(project_id.to_string(), collection.to_string()))
            .cloned()
    }

    /// Number of accepted saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    async fn save(
        &self,
        collection: &str,
        payload: &Value,
        project_id: &str,
    ) -> Result<(), StorageError> {
        if self.failing.lock().contains(collection) {
            return Err(StorageError::Rejected {
                collection: collection.to_string(),
                message: "storage is unavailable".to_string(),
            });
        }
        self.insert(collection, project_id, payload.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, collection: &str, project_id: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.document(collection, project_id))
    }
}
