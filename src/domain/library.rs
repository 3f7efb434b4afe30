use super::destination::{DestinationMapping, MappingAction, MappingField};

/// A configuration template that replaces a destination's mappings and
/// optionally its table name.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingPreset {
    pub id: &'static str,
    pub display_name: &'static str,
    pub mapping: DestinationMapping,
    pub table_name: Option<&'static str>,
}

pub fn presets() -> Vec<MappingPreset> {
    vec![
        MappingPreset {
            id: "segment",
            display_name: "Segment compatibility",
            mapping: DestinationMapping::new(
                vec![
                    MappingField::moved("/eventn_ctx/event_id", "/message_id"),
                    MappingField::moved("/eventn_ctx/user/anonymous_id", "/anonymous_id"),
                    MappingField::moved("/eventn_ctx/user/internal_id", "/user_id"),
                    MappingField::moved("/eventn_ctx/url", "/context_page_url"),
                    MappingField::moved("/eventn_ctx/referer", "/context_page_referrer"),
                    MappingField::moved("/eventn_ctx/user_agent", "/context_user_agent"),
                    MappingField {
                        src_field: "/eventn_ctx/utc_time".to_string(),
                        dst_field: Some("/timestamp".to_string()),
                        action: MappingAction::Cast,
                        sql_type: Some("timestamp".to_string()),
                        value: None,
                    },
                    MappingField {
                        src_field: "/eventn_ctx/ids".to_string(),
                        dst_field: None,
                        action: MappingAction::Remove,
                        sql_type: None,
                        value: None,
                    },
                ],
                false,
            ),
            table_name: Some("events"),
        },
        MappingPreset {
            id: "blank",
            display_name: "Keep all fields",
            mapping: DestinationMapping::new(Vec::new(), true),
            table_name: None,
        },
    ]
}

pub fn preset(id: &str) -> Option<MappingPreset> {
    presets().into_iter().find(|preset| preset.id == id)
}
