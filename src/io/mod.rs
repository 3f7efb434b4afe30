mod document;
mod format;

pub use document::{parse_document_str, serialize_document};
pub use format::DocumentFormat;
