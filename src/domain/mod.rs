mod destination;
mod ids;
mod library;
mod reference;
mod source;

pub use destination::{
    DEFAULT_CONNECTION_ERROR, DestinationData, DestinationMapping, DraftError, MappingAction,
    MappingField,
};
pub use ids::{first_to_lower, random_id, unique_auto_inc_id};
pub use library::{MappingPreset, preset, presets};
pub use reference::{DestinationCatalog, DestinationReference, Parameter, ProbeSpec};
pub use source::SourceData;
