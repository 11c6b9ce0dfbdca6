use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// One controlled-vocabulary entry: display name and its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub name: String,
    pub id: String,
}

impl VocabularyTerm {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self { name: name.into(), id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One coded-concept assignment attached to a sentence record.
///
/// `hpo_id` is expected to match the vocabulary entry for `hpo_name`, but free
/// text names outside the vocabulary are kept as-is with their last known id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptAnnotation {
    #[serde(rename = "hpoId")]
    pub hpo_id: String,
    #[serde(rename = "hpoName")]
    pub hpo_name: String,
}

impl ConceptAnnotation {
    pub fn new(hpo_id: impl Into<String>, hpo_name: impl Into<String>) -> Self {
        Self { hpo_id: hpo_id.into(), hpo_name: hpo_name.into() }
    }

    /// Empty slot, as offered on a freshly inserted record.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Session-local record identifier. Generated once per record on load or
/// insertion and never exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One annotated sentence of a clinical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: RecordId,
    pub sentence: String,
    pub concerned_person: String,
    pub negated: bool,
    pub modified: bool,
    /// Display and export order is preserved.
    pub concepts: Vec<ConceptAnnotation>,
}

impl AnnotationRecord {
    pub fn new(
        sentence: impl Into<String>,
        concerned_person: impl Into<String>,
        negated: bool,
        modified: bool,
        concepts: Vec<ConceptAnnotation>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            sentence: sentence.into(),
            concerned_person: concerned_person.into(),
            negated,
            modified,
            concepts,
        }
    }

    /// Blank record offered by "insert after": empty text, unmodified, one
    /// empty concept slot, fresh id.
    pub fn blank() -> Self {
        Self::new("", "", false, false, vec![ConceptAnnotation::empty()])
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub records: Vec<AnnotationRecord>,
    /// Free-text reviewer commentary. Only exported when the session enables it.
    pub commentary: String,
}

impl Document {
    pub fn new(records: Vec<AnnotationRecord>) -> Self {
        Self { records, commentary: String::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
