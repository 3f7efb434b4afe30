use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::ids::{random_id, unique_auto_inc_id};

pub const DEFAULT_CONNECTION_ERROR: &str = "Failed to validate connection";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("destination draft is not a JSON object")]
    NotAnObject,
    #[error("merged fields do not form a valid destination: {0}")]
    Shape(#[from] serde_json::Error),
}

/// The destination record under edit. Top-level keys nobody declares are kept
/// in `extra` so that panel merges round-trip them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationData {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_formData", default)]
    pub form_data: Map<String, Value>,
    #[serde(rename = "_mappings", default)]
    pub mappings: DestinationMapping,
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "_onlyKeys", default)]
    pub only_keys: Vec<String>,
    #[serde(rename = "_sources", default)]
    pub sources: Vec<String>,
    #[serde(rename = "_connectionTestOk", default)]
    pub connection_test_ok: bool,
    #[serde(
        rename = "_connectionErrorMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub connection_error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DestinationData {
    /// Synthesizes a fresh draft whose `_id` is unique among `existing_ids`.
    pub fn create<'a>(kind: &str, existing_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            id: unique_auto_inc_id(kind, existing_ids),
            uid: random_id(),
            kind: kind.to_string(),
            form_data: Map::new(),
            mappings: DestinationMapping {
                mappings: Vec::new(),
                keep_unmapped_fields: Some(true),
            },
            comment: None,
            only_keys: Vec::new(),
            sources: Vec::new(),
            connection_test_ok: false,
            connection_error_message: None,
            extra: Map::new(),
        }
    }

    pub fn to_value(&self) -> Result<Value, DraftError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Shallow-merges `fields` over the draft's top-level keys. `_id` and
    /// `_uid` are never taken from the merged fields.
    pub fn merge_fields(&mut self, fields: Map<String, Value>) -> Result<(), DraftError> {
        let Value::Object(mut current) = self.to_value()? else {
            return Err(DraftError::NotAnObject);
        };
        for (key, value) in fields {
            if key == "_id" || key == "_uid" {
                continue;
            }
            current.insert(key, value);
        }
        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }

    pub fn table_name(&self) -> Option<&str> {
        self.form_data.get("tableName").and_then(Value::as_str)
    }

    pub fn set_table_name(&mut self, table_name: impl Into<String>) {
        self.form_data
            .insert("tableName".to_string(), Value::String(table_name.into()));
    }

    pub fn is_linked(&self) -> bool {
        !self.sources.is_empty() || !self.only_keys.is_empty()
    }

    pub fn record_connection_result(&mut self, success: bool, message: Option<String>) {
        self.connection_test_ok = success;
        self.connection_error_message = if success {
            None
        } else {
            Some(
                message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CONNECTION_ERROR.to_string()),
            )
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationMapping {
    #[serde(rename = "_mappings", default)]
    pub mappings: Vec<MappingField>,
    /// Left as read from upstream until [`DestinationMapping::normalize`] runs.
    #[serde(
        rename = "_keepUnmappedFields",
        default,
        deserialize_with = "truthy",
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_unmapped_fields: Option<bool>,
}

impl DestinationMapping {
    pub fn new(mappings: Vec<MappingField>, keep_unmapped_fields: bool) -> Self {
        Self {
            mappings,
            keep_unmapped_fields: Some(keep_unmapped_fields),
        }
    }

    pub fn keeps_unmapped_fields(&self) -> bool {
        self.keep_unmapped_fields.unwrap_or(false)
    }

    pub fn normalize(&mut self) {
        self.keep_unmapped_fields = Some(self.keeps_unmapped_fields());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingAction {
    Move,
    Remove,
    Cast,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingField {
    #[serde(rename = "_srcField")]
    pub src_field: String,
    #[serde(rename = "_dstField", default, skip_serializing_if = "Option::is_none")]
    pub dst_field: Option<String>,
    #[serde(rename = "_action")]
    pub action: MappingAction,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<String>,
    #[serde(rename = "_value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl MappingField {
    pub fn moved(src: &str, dst: &str) -> Self {
        Self {
            src_field: src.to_string(),
            dst_field: Some(dst.to_string()),
            action: MappingAction::Move,
            sql_type: None,
            value: None,
        }
    }
}

/// JSON truthiness; `null` stays unset.
fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::Bool(flag) => Some(flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan())),
        Value::String(text) => Some(!text.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }))
}
