use annotator_core::RecordId;
use annotator_recon::{ControlChoice, ModifiedControl, RecordField};
use serde::Serialize;

/// Modification state of one record, as the editor would display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordStatus {
    pub index: usize,
    pub id: RecordId,
    /// Stored, exported flag.
    pub modified: bool,
    /// What comparison with the baseline says right now.
    pub computed: bool,
    pub control: ModifiedControl,
    /// Position the control shows: the explicit choice, else the default
    /// derived from the stored flag.
    pub control_position: ControlChoice,
    pub changed: Vec<RecordField>,
}
