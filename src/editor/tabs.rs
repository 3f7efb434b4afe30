use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::{
    domain::DestinationReference,
    form::{FieldSchema, FormSchemaError, PanelForm, ValidationErrors},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelKey {
    #[default]
    Config,
    Mappings,
    Sources,
    Settings,
    Statistics,
}

impl PanelKey {
    pub const ALL: [PanelKey; 5] = [
        PanelKey::Config,
        PanelKey::Mappings,
        PanelKey::Sources,
        PanelKey::Settings,
        PanelKey::Statistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKey::Config => "config",
            PanelKey::Mappings => "mappings",
            PanelKey::Sources => "sources",
            PanelKey::Settings => "settings",
            PanelKey::Statistics => "statistics",
        }
    }
}

impl fmt::Display for PanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PanelKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| format!("unknown panel '{value}'"))
    }
}

/// How a panel's errors are surfaced. `Warning` errors come from the advisory
/// rule and never block a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorsLevel {
    #[default]
    Error,
    Warning,
}

/// What the host renders inside a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    ConnectionProperties,
    Mappings,
    LinkedSources { load_error: Option<String> },
    MappingsLibrary,
    ComingSoon { documentation: &'static str },
}

#[derive(Debug)]
pub struct Panel {
    pub key: PanelKey,
    pub name: &'static str,
    pub content: PanelContent,
    pub form: Option<PanelForm>,
    pub errors_level: ErrorsLevel,
    pub disabled: bool,
    /// A blank value in this field raises an advisory error on an otherwise
    /// valid panel.
    pub advisory_field: Option<&'static str>,
    pub touched: bool,
    /// `None` until the panel has been validated once.
    pub errors_count: Option<usize>,
}

impl Panel {
    fn new(key: PanelKey, name: &'static str, content: PanelContent) -> Self {
        Self {
            key,
            name,
            content,
            form: None,
            errors_level: ErrorsLevel::Error,
            disabled: false,
            advisory_field: None,
            touched: false,
            errors_count: None,
        }
    }

    fn with_form(mut self, form: PanelForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.errors_count.is_some_and(|count| count > 0)
    }

    /// Validates the panel form and records `errors_count`. Panels without a
    /// form validate to an empty field set.
    pub fn validate(&mut self) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(form) = self.form.as_mut() else {
            self.errors_count = Some(0);
            return Ok(Map::new());
        };
        match form.validate() {
            Ok(values) => {
                let advisory = self
                    .advisory_field
                    .is_some_and(|name| values.get(name).is_none_or(is_empty_value));
                self.errors_count = Some(usize::from(advisory));
                if advisory {
                    tracing::debug!(panel = %self.key, "panel passes with an advisory error");
                }
                Ok(values)
            }
            Err(errors) => {
                self.errors_count = Some(errors.count());
                Err(errors)
            }
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Panel with outstanding errors, as listed in an error popover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelErrors {
    pub key: PanelKey,
    pub name: &'static str,
    pub count: usize,
    pub level: ErrorsLevel,
}

impl From<&Panel> for PanelErrors {
    fn from(panel: &Panel) -> Self {
        Self {
            key: panel.key,
            name: panel.name,
            count: panel.errors_count.unwrap_or(0),
            level: panel.errors_level,
        }
    }
}

pub(crate) fn build_panels(
    reference: &DestinationReference,
    draft: &Value,
    sources_error: Option<String>,
) -> Result<Vec<Panel>, FormSchemaError> {
    let mut config = PanelForm::new(connection_fields(reference))?;
    config.seed_from_value(draft);
    let mut mappings = PanelForm::new(mapping_fields())?;
    mappings.seed_from_value(draft);
    let mut linked = PanelForm::new(linked_source_fields())?;
    linked.seed_from_value(draft);

    let mut sources_panel = Panel::new(
        PanelKey::Sources,
        "Linked Connectors & API Keys",
        PanelContent::LinkedSources {
            load_error: sources_error,
        },
    )
    .with_form(linked);
    sources_panel.errors_level = ErrorsLevel::Warning;
    sources_panel.advisory_field = Some("_sources");

    let mut statistics = Panel::new(
        PanelKey::Statistics,
        "Statistics",
        PanelContent::ComingSoon {
            documentation: "A detailed statistics on how many events have been sent to the destinations",
        },
    );
    statistics.disabled = true;

    Ok(vec![
        Panel::new(
            PanelKey::Config,
            "Connection Properties",
            PanelContent::ConnectionProperties,
        )
        .with_form(config),
        Panel::new(PanelKey::Mappings, "Mappings", PanelContent::Mappings).with_form(mappings),
        sources_panel,
        Panel::new(
            PanelKey::Settings,
            "Configuration Templates",
            PanelContent::MappingsLibrary,
        ),
        statistics,
    ])
}

fn connection_fields(reference: &DestinationReference) -> Vec<FieldSchema> {
    reference
        .parameters
        .iter()
        .map(FieldSchema::from)
        .chain(std::iter::once(FieldSchema::new(
            "_comment",
            "Description",
            json!({"type": ["string", "null"]}),
        )))
        .collect()
}

fn mapping_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new(
            "_mappings._mappings",
            "Mappings",
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["_srcField", "_action"],
                    "properties": {
                        "_srcField": {"type": "string", "minLength": 1},
                        "_dstField": {"type": "string", "minLength": 1},
                        "_action": {"enum": ["move", "remove", "cast", "constant"]},
                        "_type": {"type": "string"}
                    },
                    "allOf": [
                        {
                            "if": {"properties": {"_action": {"const": "move"}}},
                            "then": {"required": ["_dstField"]}
                        },
                        {
                            "if": {"properties": {"_action": {"const": "cast"}}},
                            "then": {"required": ["_type"]}
                        }
                    ]
                }
            }),
        )
        .with_default(json!([])),
        FieldSchema::new(
            "_mappings._keepUnmappedFields",
            "Keep unnamed fields",
            json!({"type": "boolean"}),
        ),
    ]
}

/// Linked ids are not checked against the loaded sources: a link to a deleted
/// source must not block the save, and linking skips unknown ids.
fn linked_source_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new(
            "_sources",
            "Connectors",
            json!({"type": "array", "items": {"type": "string"}, "uniqueItems": true}),
        )
        .with_default(json!([])),
        FieldSchema::new(
            "_onlyKeys",
            "API Keys",
            json!({"type": "array", "items": {"type": "string"}, "uniqueItems": true}),
        )
        .with_default(json!([])),
    ]
}
