use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceData {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "sourceType", default)]
    pub source_type: String,
    /// `_uid`s of the destinations this source feeds.
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceData {
    pub fn new(source_id: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source_type: source_type.into(),
            destinations: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_destinations(mut self, destinations: Vec<String>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn feeds(&self, destination_uid: &str) -> bool {
        self.destinations.iter().any(|uid| uid == destination_uid)
    }
}
