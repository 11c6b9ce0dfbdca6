//! `annotator-vocab` - controlled-vocabulary index.
//!
//! Exact name → id lookup, selection-control candidate lists that never drop
//! a custom name, and deterministic fuzzy search for manual lookup.

pub mod audit;
pub mod fuzzy;
pub mod index;

pub use audit::LookupInconsistency;
pub use fuzzy::FuzzyMatch;
pub use index::{Presentation, Selection, VocabularyIndex};
