use indexmap::IndexMap;
use serde_json::{Value, json};

/// Describes how to open a TCP connection to a destination from its
/// connection properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpec {
    pub host_field: String,
    pub port_field: String,
    pub default_port: u16,
}

/// One connection property of a destination type. `id` is the dotted field
/// name inside the draft, e.g. `_formData.pghost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: String,
    pub display_name: String,
    pub required: bool,
    pub schema: Value,
    pub default_value: Option<Value>,
}

impl Parameter {
    pub fn new(id: &str, display_name: &str, schema: Value) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            required: false,
            schema,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationReference {
    pub id: String,
    pub display_name: String,
    pub parameters: Vec<Parameter>,
    pub probe: Option<ProbeSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct DestinationCatalog {
    references: IndexMap<String, DestinationReference>,
}

impl DestinationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(sql_reference("postgres", "PostgreSQL", "pg", 5432));
        catalog.register(sql_reference("mysql", "MySQL", "mysql", 3306));
        catalog.register(sql_reference("redshift", "Redshift", "redshift", 5439));
        catalog.register(DestinationReference {
            id: "clickhouse".to_string(),
            display_name: "ClickHouse".to_string(),
            parameters: vec![
                table_name_parameter(),
                Parameter::new(
                    "_formData.ch_dsns_list",
                    "Datasources",
                    json!({"type": "array", "items": {"type": "string", "minLength": 1}, "minItems": 1}),
                )
                .required(),
                Parameter::new(
                    "_formData.ch_database",
                    "Database",
                    json!({"type": "string", "minLength": 1}),
                )
                .required(),
                Parameter::new("_formData.ch_cluster", "Cluster", json!({"type": "string"})),
            ],
            probe: None,
        });
        catalog
    }

    pub fn register(&mut self, reference: DestinationReference) {
        self.references.insert(reference.id.clone(), reference);
    }

    pub fn get(&self, kind: &str) -> Option<&DestinationReference> {
        self.references.get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationReference> {
        self.references.values()
    }
}

fn table_name_parameter() -> Parameter {
    Parameter::new(
        "_formData.tableName",
        "Table Name",
        json!({"type": "string", "pattern": "^[A-Za-z_{][A-Za-z0-9_{}.\\[\\]]*$"}),
    )
    .required()
    .with_default(json!("events"))
}

fn sql_reference(id: &str, display_name: &str, prefix: &str, port: u16) -> DestinationReference {
    let host = format!("_formData.{prefix}host");
    let port_field = format!("_formData.{prefix}port");
    let probe = ProbeSpec {
        host_field: format!("{prefix}host"),
        port_field: format!("{prefix}port"),
        default_port: port,
    };
    DestinationReference {
        id: id.to_string(),
        display_name: display_name.to_string(),
        parameters: vec![
            table_name_parameter(),
            Parameter::new(&host, "Host", json!({"type": "string", "minLength": 1})).required(),
            Parameter::new(
                &port_field,
                "Port",
                json!({"type": "integer", "minimum": 1, "maximum": 65535}),
            )
            .with_default(json!(port)),
            Parameter::new(
                &format!("_formData.{prefix}db"),
                "Database",
                json!({"type": "string", "minLength": 1}),
            )
            .required(),
            Parameter::new(
                &format!("_formData.{prefix}user"),
                "Username",
                json!({"type": "string", "minLength": 1}),
            )
            .required(),
            Parameter::new(
                &format!("_formData.{prefix}password"),
                "Password",
                json!({"type": "string"}),
            ),
        ],
        probe: Some(probe),
    }
}
