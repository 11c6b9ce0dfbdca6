use annotator_core::AnnotationRecord;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Comparison policy
// ---------------------------------------------------------------------------

/// How concept sequences are compared against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptComparison {
    /// Pairwise up to the shorter length. Adding or removing concepts while
    /// every common position is equal is not a difference.
    #[default]
    CommonPrefix,
    /// Pairwise, and a length change is itself a difference.
    Strict,
}

/// A field that differs from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum RecordField {
    Sentence,
    ConcernedPerson,
    Negated,
    Concept { index: usize },
    ConceptCount { current: usize, original: usize },
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentence => write!(f, "sentence"),
            Self::ConcernedPerson => write!(f, "concerned_person"),
            Self::Negated => write!(f, "negated"),
            Self::Concept { index } => write!(f, "concept {}", index + 1),
            Self::ConceptCount { current, original } => {
                write!(f, "concept count {original} -> {current}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Every field of `current` that differs from `original`. Exact string and
/// boolean equality, no normalization.
pub fn changed_fields(
    current: &AnnotationRecord,
    original: &AnnotationRecord,
    concepts: ConceptComparison,
) -> Vec<RecordField> {
    let mut changed = Vec::new();

    if current.sentence != original.sentence {
        changed.push(RecordField::Sentence);
    }
    if current.concerned_person != original.concerned_person {
        changed.push(RecordField::ConcernedPerson);
    }
    if current.negated != original.negated {
        changed.push(RecordField::Negated);
    }

    for (index, (now, then)) in current.concepts.iter().zip(&original.concepts).enumerate() {
        if now.hpo_id != then.hpo_id || now.hpo_name != then.hpo_name {
            changed.push(RecordField::Concept { index });
        }
    }

    if concepts == ConceptComparison::Strict && current.concepts.len() != original.concepts.len() {
        changed.push(RecordField::ConceptCount {
            current: current.concepts.len(),
            original: original.concepts.len(),
        });
    }

    changed
}

/// True when any compared field of `current` differs from `original`.
pub fn compute_modified(
    current: &AnnotationRecord,
    original: &AnnotationRecord,
    concepts: ConceptComparison,
) -> bool {
    !changed_fields(current, original, concepts).is_empty()
}
