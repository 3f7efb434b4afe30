mod connectivity;
mod file;
mod memory;
mod sources;
mod storage;

use std::sync::Arc;

pub use connectivity::{
    ConnectionTestResult, ConnectivityCheck, StaticConnectivityCheck, TcpConnectivityCheck,
};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sources::{SourcesLinker, StorageSourcesLinker, link_sources};
pub use storage::{DESTINATIONS_COLLECTION, SOURCES_COLLECTION, StorageError, StorageService};

/// The external collaborators one editor session talks to, scoped to the
/// active project.
#[derive(Clone)]
pub struct Services {
    pub storage: Arc<dyn StorageService>,
    pub connectivity: Arc<dyn ConnectivityCheck>,
    pub sources: Arc<dyn SourcesLinker>,
    pub project_id: String,
}

impl Services {
    /// Sources linkage is persisted through the same storage.
    pub fn new(
        storage: Arc<dyn StorageService>,
        connectivity: Arc<dyn ConnectivityCheck>,
        project_id: impl Into<String>,
    ) -> Self {
        let sources = Arc::new(StorageSourcesLinker::new(Arc::clone(&storage)));
        Self {
            storage,
            connectivity,
            sources,
            project_id: project_id.into(),
        }
    }

    pub fn with_sources_linker(mut self, linker: Arc<dyn SourcesLinker>) -> Self {
        self.sources = linker;
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
