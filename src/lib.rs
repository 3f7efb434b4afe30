#![deny(rust_2018_idioms)]

pub mod collection;
pub mod domain;
pub mod editor;
pub mod form;
pub mod io;
pub mod loader;
pub mod services;


pub use collection::SharedCollection;
pub use editor::{
    DestinationEditor, EditorContext, EditorError, EditorEvent, EditorMode, EditorOptions,
    EditorParams, PanelKey, SubmitOutcome, TestConnectionOutcome,
};

pub mod prelude {
    pub use super::{
        DestinationEditor, EditorContext, EditorEvent, EditorMode, EditorOptions, EditorParams,
        PanelKey, SharedCollection, SubmitOutcome, TestConnectionOutcome,
    };
    pub use crate::domain::{DestinationCatalog, DestinationData, SourceData};
    pub use crate::services::{
        ConnectionTestResult, FileStorage, MemoryStorage, Services, StaticConnectivityCheck,
        TcpConnectivityCheck,
    };
}
