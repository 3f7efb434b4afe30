use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub name: String,
    pub errors: Vec<String>,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.errors.join("; "))
    }
}

/// Rejection of a panel's `validate`. One entry per invalid field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} field(s) failed validation", .error_fields.len())]
pub struct ValidationErrors {
    pub error_fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn count(&self) -> usize {
        self.error_fields.len()
    }
}

#[derive(Debug, Error)]
#[error("field {field} has an invalid schema: {message}")]
pub struct FormSchemaError {
    pub field: String,
    pub message: String,
}
