use serde_json::Value;

/// Messages a panel form accepts. Other panels never write a form's values
/// directly; they send one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetFieldsValue(Vec<(String, Value)>),
    FieldEdited { name: String, value: Value },
}
