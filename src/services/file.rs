use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::io::{DocumentFormat, parse_document_str, serialize_document};

use super::storage::{StorageError, StorageService};

/// Stores each collection as `<root>/<project>/<collection>.<ext>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    format: DocumentFormat,
    pretty: bool,
}

impl FileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            format: DocumentFormat::Json,
            pretty: true,
        }
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn document_path(&self, collection: &str, project_id: &str) -> PathBuf {
        self.root
            .join(project_id)
            .join(format!("{collection}.{}", self.format.extension()))
    }
}

#[async_trait]
impl StorageService for FileStorage {
    async fn save(
        &self,
        collection: &str,
        payload: &Value,
        project_id: &str,
    ) -> Result<(), StorageError> {
        let path = self.document_path(collection, project_id);
        let mut contents = serialize_document(payload, self.format, self.pretty)?;
        contents.push('\n');
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        // readers never observe a half-written document
        let staging = path.with_extension(format!("{}.tmp", self.format.extension()));
        tokio::fs::write(&staging, contents)
            .await
            .map_err(|source| StorageError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(collection, project_id, path = %path.display(), "stored document");
        Ok(())
    }

    async fn get(&self, collection: &str, project_id: &str) -> Result<Option<Value>, StorageError> {
        let path = self.document_path(collection, project_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        let value = parse_document_str(&contents, self.format)?;
        Ok(Some(value))
    }
}
