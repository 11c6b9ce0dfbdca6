use annotator_core::{AnnotationRecord, RecordId, Snapshot};

use crate::error::ReconError;

/// Insert a record built by `factory` right after `index`, and the same record
/// as its own baseline at the same position of `snapshot`.
///
/// The baseline equals the new record, so it starts unmodified. Returns the
/// new record's position and id. Nothing changes on error.
pub fn insert_after(
    records: &mut Vec<AnnotationRecord>,
    snapshot: &mut Snapshot,
    index: usize,
    factory: impl FnOnce() -> AnnotationRecord,
) -> Result<(usize, RecordId), ReconError> {
    if records.len() != snapshot.len() {
        return Err(ReconError::SnapshotMisaligned { records: records.len(), snapshot: snapshot.len() });
    }
    if index >= records.len() {
        return Err(ReconError::IndexOutOfRange { index, len: records.len() });
    }

    let record = factory();
    let id = record.id;
    let position = index + 1;

    snapshot.insert_baseline(position, record.clone());
    records.insert(position, record);

    tracing::debug!(position, %id, "record inserted");
    Ok((position, id))
}
