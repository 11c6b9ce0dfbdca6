//! `annotator-recon` - decides whether an annotation record counts as modified.
//!
//! Pure engine crate: compares a live record with its load-time baseline,
//! merges the result with the annotator's explicit choice, and keeps the
//! baseline aligned when records are inserted. No IO.

pub mod compare;
pub mod control;
pub mod error;
pub mod insert;

pub use compare::{changed_fields, compute_modified, ConceptComparison, RecordField};
pub use control::{control_default, reconcile, ControlChoice, ModifiedControl, ReconcilePolicy};
pub use error::ReconError;
pub use insert::insert_after;
