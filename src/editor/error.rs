use thiserror::Error;

use crate::{domain::DraftError, form::FormSchemaError};

use super::tabs::PanelKey;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown destination type '{0}'")]
    UnknownType(String),
    #[error("destination '{0}' does not exist and no type was given to create it")]
    NotFound(String),
    #[error("a destination type or an existing destination id is required")]
    MissingType,
    #[error("no panel declares field '{0}'")]
    UnknownField(String),
    #[error("panel {0} has no form")]
    NoForm(PanelKey),
    #[error("unknown mapping preset '{0}'")]
    UnknownPreset(String),
    #[error(transparent)]
    Schema(#[from] FormSchemaError),
    #[error(transparent)]
    Draft(#[from] DraftError),
}
