use serde_json::Value;

use crate::domain::Parameter;

/// Declaration of one form field. `name` is dotted (`_formData.tableName`);
/// `path` and `pointer` address the same location inside the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub path: Vec<String>,
    pub pointer: String,
    pub title: String,
    pub required: bool,
    pub schema: Value,
    pub default: Option<Value>,
}

impl FieldSchema {
    pub fn new(name: &str, title: &str, schema: Value) -> Self {
        let path: Vec<String> = name.split('.').map(str::to_string).collect();
        let pointer = path.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment.replace('~', "~0").replace('/', "~1"));
            acc
        });
        Self {
            name: name.to_string(),
            path,
            pointer,
            title: title.to_string(),
            required: false,
            schema,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn display_label(&self) -> String {
        if self.title.eq_ignore_ascii_case(&self.name) {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.name)
        }
    }
}

impl From<&Parameter> for FieldSchema {
    fn from(param: &Parameter) -> Self {
        let mut schema = FieldSchema::new(&param.id, &param.display_name, param.schema.clone());
        schema.required = param.required;
        schema.default = param.default_value.clone();
        schema
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: FieldSchema,
    pub value: Option<Value>,
    pub errors: Vec<String>,
}

impl FieldState {
    pub fn from_schema(schema: FieldSchema) -> Self {
        let value = schema.default.clone();
        Self {
            schema,
            value,
            errors: Vec::new(),
        }
    }

    pub fn seed_value(&mut self, value: &Value) {
        self.value = Some(value.clone());
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn is_blank(&self) -> bool {
        match &self.value {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_errors(&mut self, errors: Vec<String>) {
        self.errors = errors;
    }

    pub fn clear_error(&mut self) {
        self.errors.clear();
    }
}
