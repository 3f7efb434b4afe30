use jsonschema::Validator;
use serde_json::{Map, Value};

use super::{
    actions::FormCommand,
    error::{FieldError, FormSchemaError, ValidationErrors},
    field::{FieldSchema, FieldState},
    marshal::value_at_path,
    reducers::apply_command,
};

/// Live field state of one panel plus the compiled validators for its fields.
pub struct PanelForm {
    fields: Vec<FieldState>,
    validators: Vec<Validator>,
}

impl std::fmt::Debug for PanelForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelForm")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl PanelForm {
    pub fn new(schemas: Vec<FieldSchema>) -> Result<Self, FormSchemaError> {
        let mut fields = Vec::with_capacity(schemas.len());
        let mut validators = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let validator = jsonschema::validator_for(&schema.schema).map_err(|err| {
                FormSchemaError {
                    field: schema.name.clone(),
                    message: err.to_string(),
                }
            })?;
            validators.push(validator);
            fields.push(FieldState::from_schema(schema));
        }
        Ok(Self { fields, validators })
    }

    /// Seeds every field present in `value` (looked up by path); fields that
    /// are absent keep their declared default.
    pub fn seed_from_value(&mut self, value: &Value) {
        for field in &mut self.fields {
            if let Some(subvalue) = value_at_path(value, &field.schema.path)
                && !subvalue.is_null()
            {
                field.seed_value(subvalue);
            }
        }
    }

    pub fn dispatch(&mut self, command: FormCommand) -> usize {
        apply_command(self, command)
    }

    pub fn set_field_value(&mut self, name: &str, value: Value) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.set_value(value);
                true
            }
            None => false,
        }
    }

    pub fn field_value(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|field| field.value.as_ref())
    }

    /// Current values keyed by dotted field name, unset fields omitted.
    pub fn fields_value(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .value
                    .as_ref()
                    .map(|value| (field.schema.name.clone(), value.clone()))
            })
            .collect()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    /// Runs every field's rules. Errors are recorded on the fields either way.
    pub fn validate(&mut self) -> Result<Map<String, Value>, ValidationErrors> {
        let mut error_fields = Vec::new();
        for (field, validator) in self.fields.iter_mut().zip(&self.validators) {
            field.clear_error();
            let mut errors = Vec::new();
            if field.is_blank() {
                if field.schema.required {
                    errors.push(format!("'{}' is required", field.schema.title));
                }
            } else if let Some(value) = &field.value {
                errors.extend(validator.iter_errors(value).map(|err| err.to_string()));
            }
            if !errors.is_empty() {
                error_fields.push(FieldError {
                    name: field.schema.name.clone(),
                    errors: errors.clone(),
                });
                field.set_errors(errors);
            }
        }
        if error_fields.is_empty() {
            Ok(self.fields_value())
        } else {
            Err(ValidationErrors { error_fields })
        }
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().filter(|field| field.has_error()).count()
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.clear_error();
        }
    }

    fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.schema.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.schema.name == name)
    }
}
