//! `annotator-core` - data model shared by every annotator crate.
//!
//! No IO, no vocabulary logic: plain records, the document that holds them,
//! and the load-time snapshot used as the modification baseline.

pub mod model;
pub mod snapshot;

pub use model::{AnnotationRecord, ConceptAnnotation, Document, RecordId, VocabularyTerm};
pub use snapshot::Snapshot;
