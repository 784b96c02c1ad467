//! Insurance policy field extraction.
//!
//! Pattern extractors find candidate values, the context matcher labels
//! them with a field from the taxonomy, the validator adjusts confidence and
//! the parser resolves everything into one field map per document.

pub mod context;
mod parser;
pub mod rules;
pub mod table;
pub mod taxonomy;
pub mod validate;

pub use context::{ContextMatcher, FieldMatch};
pub use parser::{classify_document, DocumentParser, InsuranceParser, PageExtraction};
pub use table::{InterpretedTable, TableInterpreter};
pub use taxonomy::{FieldSpec, ValueKind, TAXONOMY};
