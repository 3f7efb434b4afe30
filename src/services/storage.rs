use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub const DESTINATIONS_COLLECTION: &str = "destinations";
pub const SOURCES_COLLECTION: &str = "sources";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage rejected {collection}: {message}")]
    Rejected { collection: String, message: String },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {collection} document: {message}")]
    Malformed { collection: String, message: String },
    #[error(transparent)]
    Document(#[from] anyhow::Error),
}

/// Project-scoped document store. A collection is one JSON document such as
/// `{"destinations": [...]}`.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn save(
        &self,
        collection: &str,
        payload: &Value,
        project_id: &str,
    ) -> Result<(), StorageError>;

    /// `None` when the collection was never saved.
    async fn get(&self, collection: &str, project_id: &str) -> Result<Option<Value>, StorageError>;
}
