use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    domain::{DestinationData, SourceData},
    services::{DESTINATIONS_COLLECTION, SOURCES_COLLECTION, StorageError, StorageService},
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            LoadState::Loaded(data) => Ok(data),
            LoadState::Failed(message) => Err(message),
            LoadState::Loading => Err("still loading".to_string()),
        }
    }
}

/// Drives `loader` to completion. There is no state besides
/// loading → loaded | failed.
pub async fn load<T, E, F>(loader: F) -> LoadState<T>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match loader.await {
        Ok(data) => LoadState::Loaded(data),
        Err(err) => LoadState::Failed(err.to_string()),
    }
}

pub async fn load_destinations(
    storage: &dyn StorageService,
    project_id: &str,
) -> Result<Vec<DestinationData>, StorageError> {
    load_list(storage, DESTINATIONS_COLLECTION, project_id).await
}

pub async fn load_sources(
    storage: &dyn StorageService,
    project_id: &str,
) -> Result<Vec<SourceData>, StorageError> {
    load_list(storage, SOURCES_COLLECTION, project_id).await
}

async fn load_list<T: DeserializeOwned>(
    storage: &dyn StorageService,
    collection: &str,
    project_id: &str,
) -> Result<Vec<T>, StorageError> {
    let Some(document) = storage.get(collection, project_id).await? else {
        return Ok(Vec::new());
    };
    let items = match document {
        Value::Object(mut map) => map.remove(collection).unwrap_or(Value::Array(Vec::new())),
        other => {
            return Err(StorageError::Malformed {
                collection: collection.to_string(),
                message: format!("expected an object, found {other}"),
            });
        }
    };
    serde_json::from_value(items).map_err(|err| StorageError::Malformed {
        collection: collection.to_string(),
        message: err.to_string(),
    })
}
