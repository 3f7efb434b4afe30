use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{DestinationData, SourceData};

use super::storage::{SOURCES_COLLECTION, StorageError, StorageService};

/// Adds `draft`'s `_uid` to every source the draft links and removes it from
/// every other source.
pub fn link_sources(sources: &[SourceData], draft: &DestinationData) -> Vec<SourceData> {
    sources
        .iter()
        .map(|source| {
            let linked = draft.sources.iter().any(|id| *id == source.source_id);
            let feeds = source.feeds(&draft.uid);
            let mut source = source.clone();
            if linked && !feeds {
                source.destinations.push(draft.uid.clone());
            } else if !linked && feeds {
                source.destinations.retain(|uid| *uid != draft.uid);
            }
            source
        })
        .collect()
}

#[async_trait]
pub trait SourcesLinker: Send + Sync {
    async fn update_sources(
        &self,
        sources: &[SourceData],
        draft: &DestinationData,
        project_id: &str,
    ) -> Result<Vec<SourceData>, StorageError>;
}

/// Computes the linkage with [`link_sources`] and persists the whole sources
/// collection.
#[derive(Clone)]
pub struct StorageSourcesLinker {
    storage: Arc<dyn StorageService>,
}

impl StorageSourcesLinker {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SourcesLinker for StorageSourcesLinker {
    async fn update_sources(
        &self,
        sources: &[SourceData],
        draft: &DestinationData,
        project_id: &str,
    ) -> Result<Vec<SourceData>, StorageError> {
        let updated = link_sources(sources, draft);
        let payload = json!({ "sources": updated });
        self.storage
            .save(SOURCES_COLLECTION, &payload, project_id)
            .await?;
        Ok(updated)
    }
}
