use serde_json::Value;

use crate::{
    domain::{DestinationMapping, preset},
    form::FormCommand,
};

use super::{
    coordinator::DestinationEditor, error::EditorError, events::Notification, tabs::PanelKey,
};

impl DestinationEditor {
    /// Replaces the draft's mappings (and optionally its table name) and
    /// pushes the new values into the live forms of the affected panels.
    ///
    /// Panels only learn about the change through their own inbox; the draft
    /// write alone would leave an already-rendered form stale.
    pub fn apply_library(
        &mut self,
        mapping: DestinationMapping,
        table_name: Option<String>,
    ) -> Result<(), EditorError> {
        let items = serde_json::to_value(&mapping.mappings).map_err(crate::domain::DraftError::from)?;
        let keep_unmapped = mapping.keeps_unmapped_fields();

        self.draft.mappings = mapping;
        if let Some(table_name) = &table_name {
            self.draft.set_table_name(table_name.clone());
        }

        self.send_to_panel(
            PanelKey::Mappings,
            FormCommand::SetFieldsValue(vec![
                ("_mappings._mappings".to_string(), items),
                (
                    "_mappings._keepUnmappedFields".to_string(),
                    Value::Bool(keep_unmapped),
                ),
            ]),
        );
        self.touch_panel(PanelKey::Mappings, Some(true));

        if let Some(table_name) = table_name {
            self.send_to_panel(
                PanelKey::Config,
                FormCommand::SetFieldsValue(vec![(
                    "_formData.tableName".to_string(),
                    Value::String(table_name),
                )]),
            );
            self.touch_panel(PanelKey::Config, Some(true));
        }

        self.bump_revision();
        tracing::info!(id = %self.draft.id, table = ?self.draft.table_name(), "mappings library applied");
        self.notify(Notification::success(
            "Mappings library has been successfully set",
        ));
        Ok(())
    }

    /// [`DestinationEditor::apply_library`] with one of the built-in
    /// configuration templates.
    pub fn apply_preset(&mut self, id: &str) -> Result<(), EditorError> {
        let preset = preset(id).ok_or_else(|| EditorError::UnknownPreset(id.to_string()))?;
        self.apply_library(preset.mapping, preset.table_name.map(str::to_string))
    }
}
