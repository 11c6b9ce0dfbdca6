use std::collections::HashMap;

use annotator_core::{AnnotationRecord, ConceptAnnotation, Document, RecordId, Snapshot};
use annotator_io::{export_file_name, parse_document, to_json_string, ExportOptions};
use annotator_recon::{
    changed_fields, compute_modified, control_default, insert_after, reconcile, ControlChoice,
    ModifiedControl, ReconcilePolicy,
};
use annotator_vocab::{LookupInconsistency, Presentation, Selection, VocabularyIndex};

use crate::edit::{Edit, EditOutcome, EditScript};
use crate::error::EngineError;
use crate::status::RecordStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub policy: ReconcilePolicy,
    /// Commentary is editable and exported.
    pub commentary: bool,
}

/// Everything tied to one loaded file. Replaced wholesale on reload.
#[derive(Debug)]
struct Loaded {
    source_name: String,
    document: Document,
    snapshot: Snapshot,
    /// Keyed by record id so controls follow records across insertions.
    controls: HashMap<RecordId, ModifiedControl>,
}

/// Single-user editing session: the vocabulary, plus the loaded document and
/// its load-time snapshot. Every edit is followed by a reconciliation pass
/// over all records.
#[derive(Debug)]
pub struct Session {
    vocabulary: VocabularyIndex,
    options: SessionOptions,
    loaded: Option<Loaded>,
}

impl Session {
    pub fn new(vocabulary: VocabularyIndex, options: SessionOptions) -> Self {
        Self { vocabulary, options, loaded: None }
    }

    pub fn vocabulary(&self) -> &VocabularyIndex {
        &self.vocabulary
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Parse `text` and make it the session's document. On a parse error the
    /// previously loaded document, if any, is kept untouched.
    pub fn load_document(&mut self, source_name: &str, text: &str) -> Result<(), EngineError> {
        let document = parse_document(text)?;
        self.load(source_name, document);
        Ok(())
    }

    /// Replace document, snapshot and controls with `document`.
    pub fn load(&mut self, source_name: &str, document: Document) {
        let snapshot = Snapshot::capture(&document.records);
        tracing::info!(source = source_name, records = document.records.len(), "document loaded");
        self.loaded = Some(Loaded {
            source_name: source_name.to_string(),
            document,
            snapshot,
            controls: HashMap::new(),
        });
        self.reconcile_all();
    }

    /// Drop the loaded document and everything derived from it.
    pub fn reset(&mut self) {
        if self.loaded.take().is_some() {
            tracing::info!("session reset");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.source_name.as_str())
    }

    pub fn document(&self) -> Result<&Document, EngineError> {
        self.loaded.as_ref().map(|l| &l.document).ok_or(EngineError::NoDocument)
    }

    pub fn snapshot(&self) -> Result<&Snapshot, EngineError> {
        self.loaded.as_ref().map(|l| &l.snapshot).ok_or(EngineError::NoDocument)
    }

    /// Live records; empty when nothing is loaded.
    pub fn records(&self) -> &[AnnotationRecord] {
        self.loaded.as_ref().map(|l| l.document.records.as_slice()).unwrap_or(&[])
    }

    pub fn control(&self, id: RecordId) -> ModifiedControl {
        self.loaded
            .as_ref()
            .and_then(|l| l.controls.get(&id).copied())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Apply one edit, then reconcile every record. A rejected edit changes
    /// nothing.
    pub fn apply(&mut self, edit: Edit) -> Result<EditOutcome, EngineError> {
        let op = edit.name();
        let options = self.options;
        let loaded = self.loaded.as_mut().ok_or(EngineError::NoDocument)?;

        let outcome = match edit {
            Edit::SetSentence { record, value } => {
                record_mut(&mut loaded.document, record)?.sentence = value;
                EditOutcome::Applied
            }
            Edit::SetConcernedPerson { record, value } => {
                record_mut(&mut loaded.document, record)?.concerned_person = value;
                EditOutcome::Applied
            }
            Edit::SetNegated { record, value } => {
                record_mut(&mut loaded.document, record)?.negated = value;
                EditOutcome::Applied
            }
            Edit::SetConceptId { record, concept, value } => {
                concept_mut(&mut loaded.document, record, concept)?.hpo_id = value;
                EditOutcome::Applied
            }
            Edit::SelectConcept { record, concept, name } => {
                let slot = concept_mut(&mut loaded.document, record, concept)?;
                let selection = self.vocabulary.select(slot, &name);
                if let Selection::Recognized { id } = &selection {
                    tracing::debug!(record, concept, name = %name, id = %id, "concept id resolved");
                }
                EditOutcome::Selected(selection)
            }
            Edit::AddConcept { record } => {
                record_mut(&mut loaded.document, record)?.concepts.push(ConceptAnnotation::empty());
                EditOutcome::Applied
            }
            Edit::RemoveConcept { record, concept } => {
                concept_mut(&mut loaded.document, record, concept)?;
                record_mut(&mut loaded.document, record)?.concepts.remove(concept);
                EditOutcome::Applied
            }
            Edit::SetModified { record, value } => {
                if !options.policy.override_control {
                    return Err(EngineError::OverrideControlDisabled);
                }
                let id = record_mut(&mut loaded.document, record)?.id;
                loaded.controls.insert(id, ModifiedControl::from(value));
                tracing::debug!(record, choice = %value, "modified control set");
                EditOutcome::Applied
            }
            Edit::InsertAfter { record } => {
                let (position, id) = insert_after(
                    &mut loaded.document.records,
                    &mut loaded.snapshot,
                    record,
                    AnnotationRecord::blank,
                )
                .map_err(|e| match e {
                    annotator_recon::ReconError::IndexOutOfRange { index, len } => {
                        EngineError::RecordOutOfRange { index, len }
                    }
                    other => EngineError::Recon(other),
                })?;
                tracing::info!(position, %id, "blank record inserted");
                EditOutcome::Inserted { position, id }
            }
            Edit::SetCommentary { value } => {
                if !options.commentary {
                    return Err(EngineError::CommentaryDisabled);
                }
                loaded.document.commentary = value;
                EditOutcome::Applied
            }
        };

        tracing::trace!(op, "edit applied");
        self.reconcile_all();
        Ok(outcome)
    }

    /// Apply a script in order. Stops at the first failing edit; edits before
    /// it stay applied.
    pub fn apply_script(&mut self, script: EditScript) -> Result<Vec<EditOutcome>, EngineError> {
        let mut outcomes = Vec::with_capacity(script.len());
        for (index, edit) in script.edits.into_iter().enumerate() {
            let outcome = self
                .apply(edit)
                .map_err(|error| EngineError::AtEdit { index, error: Box::new(error) })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Recompute every record's stored flag against its baseline.
    fn reconcile_all(&mut self) {
        let policy = self.options.policy;
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };

        for (index, record) in loaded.document.records.iter_mut().enumerate() {
            let Some(original) = loaded.snapshot.get(index) else {
                continue;
            };
            debug_assert_eq!(original.id, record.id, "snapshot out of step with document");

            let computed = compute_modified(record, original, policy.concepts);
            let control = loaded.controls.get(&record.id).copied().unwrap_or_default();
            let stored = reconcile(record.modified, computed, control, policy);
            if stored != record.modified {
                tracing::debug!(index, from = record.modified, to = stored, "modified flag changed");
                record.modified = stored;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn record_status(&self, index: usize) -> Result<RecordStatus, EngineError> {
        let loaded = self.loaded.as_ref().ok_or(EngineError::NoDocument)?;
        let record = loaded
            .document
            .records
            .get(index)
            .ok_or(EngineError::RecordOutOfRange { index, len: loaded.document.records.len() })?;
        let original = loaded.snapshot.get(index).ok_or(EngineError::Recon(
            annotator_recon::ReconError::SnapshotMisaligned {
                records: loaded.document.records.len(),
                snapshot: loaded.snapshot.len(),
            },
        ))?;

        let changed = changed_fields(record, original, self.options.policy.concepts);
        let control = loaded.controls.get(&record.id).copied().unwrap_or_default();
        let control_position = match control.explicit() {
            Some(flag) => ControlChoice::from_flag(flag),
            None => control_default(record.modified),
        };

        Ok(RecordStatus {
            index,
            id: record.id,
            modified: record.modified,
            computed: !changed.is_empty(),
            control,
            control_position,
            changed,
        })
    }

    pub fn statuses(&self) -> Result<Vec<RecordStatus>, EngineError> {
        (0..self.document()?.records.len()).map(|i| self.record_status(i)).collect()
    }

    /// Candidate names for the selection control of one concept slot.
    pub fn presentation(&self, record: usize, concept: usize) -> Result<Presentation<'_>, EngineError> {
        let document = self.document()?;
        let rec = document
            .records
            .get(record)
            .ok_or(EngineError::RecordOutOfRange { index: record, len: document.records.len() })?;
        let slot = rec.concepts.get(concept).ok_or(EngineError::ConceptOutOfRange {
            record,
            index: concept,
            len: rec.concepts.len(),
        })?;
        Ok(self.vocabulary.presentation_list(&slot.hpo_name))
    }

    /// Stored ids that disagree with the vocabulary. Logged, never fixed.
    pub fn lookup_inconsistencies(&self) -> Vec<LookupInconsistency> {
        let found = self.vocabulary.audit(self.records());
        for item in &found {
            tracing::warn!(
                record = item.record_index,
                concept = item.concept_index,
                name = %item.hpo_name,
                stored = %item.stored_id,
                expected = %item.expected_id,
                "stored concept id disagrees with vocabulary"
            );
        }
        found
    }

    pub fn export_json(&self) -> Result<String, EngineError> {
        let document = self.document()?;
        let options = ExportOptions { include_commentary: self.options.commentary };
        Ok(to_json_string(document, options)?)
    }

    pub fn export_file_name(&self, author: Option<&str>) -> Result<String, EngineError> {
        let source = self.source_name().ok_or(EngineError::NoDocument)?;
        Ok(export_file_name(source, author))
    }
}

fn record_mut(document: &mut Document, index: usize) -> Result<&mut AnnotationRecord, EngineError> {
    let len = document.records.len();
    document.records.get_mut(index).ok_or(EngineError::RecordOutOfRange { index, len })
}

fn concept_mut(
    document: &mut Document,
    record: usize,
    index: usize,
) -> Result<&mut ConceptAnnotation, EngineError> {
    let rec = record_mut(document, record)?;
    let len = rec.concepts.len();
    rec.concepts
        .get_mut(index)
        .ok_or(EngineError::ConceptOutOfRange { record, index, len })
}
