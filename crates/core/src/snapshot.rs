use crate::model::{AnnotationRecord, RecordId};

/// Deep copy of a document's records taken at load time.
///
/// The only comparison baseline for "was this record changed". Entries are
/// never edited; the one permitted mutation is inserting the baseline for a
/// newly inserted record so positions stay aligned with the live document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<AnnotationRecord>,
}

impl Snapshot {
    pub fn capture(records: &[AnnotationRecord]) -> Self {
        Self { records: records.to_vec() }
    }

    pub fn get(&self, index: usize) -> Option<&AnnotationRecord> {
        self.records.get(index)
    }

    pub fn find(&self, id: RecordId) -> Option<&AnnotationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert the baseline for a record inserted at `position` in the document.
    /// Panics if `position > len`, like `Vec::insert`.
    pub fn insert_baseline(&mut self, position: usize, record: AnnotationRecord) {
        self.records.insert(position, record);
    }
}
