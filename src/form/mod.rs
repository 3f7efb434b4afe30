mod actions;
mod error;
mod field;
mod marshal;
mod reducers;
mod state;

pub use actions::FormCommand;
pub use error::{FieldError, FormSchemaError, ValidationErrors};
pub use field::{FieldSchema, FieldState};
pub use marshal::{insert_path, make_object_from_fields_values, shallow_merge, value_at_path};
pub use state::PanelForm;
