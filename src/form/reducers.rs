use super::{actions::FormCommand, state::PanelForm};

/// Applies `command` and returns how many declared fields changed.
pub fn apply_command(form: &mut PanelForm, command: FormCommand) -> usize {
    match command {
        FormCommand::SetFieldsValue(values) => values
            .into_iter()
            .filter(|(name, value)| form.set_field_value(name, value.clone()))
            .count(),
        FormCommand::FieldEdited { name, value } => usize::from(form.set_field_value(&name, value)),
    }
}
