use std::collections::HashMap;

use annotator_core::{ConceptAnnotation, VocabularyTerm};

/// Name → id lookup built once per session from the vocabulary source.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    by_name: HashMap<String, String>,
    /// Known names, first-seen order, no duplicates.
    names: Vec<String>,
}

/// Candidate list for a concept-name selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation<'a> {
    pub candidates: Vec<&'a str>,
    pub default_index: usize,
}

impl<'a> Presentation<'a> {
    pub fn default_candidate(&self) -> Option<&'a str> {
        self.candidates.get(self.default_index).copied()
    }
}

/// Outcome of selecting a name for a concept slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Name is in the vocabulary; the slot's id was overwritten with `id`.
    Recognized { id: String },
    /// Custom or unrecognized name; the slot's id was left untouched.
    Custom,
}

impl VocabularyIndex {
    /// Index with no terms. Every name is unrecognized.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(name, id)` terms. A duplicated name keeps the id of its
    /// last occurrence and the list position of its first.
    pub fn build(terms: impl IntoIterator<Item = VocabularyTerm>) -> Self {
        let mut by_name = HashMap::new();
        let mut names = Vec::new();
        let mut duplicates = 0usize;

        for term in terms {
            match by_name.insert(term.name.clone(), term.id) {
                None => names.push(term.name),
                Some(_) => duplicates += 1,
            }
        }

        tracing::debug!(terms = names.len(), duplicates, "vocabulary index built");
        Self { by_name, names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Verbatim lookup. No trimming, no case folding.
    pub fn exact_lookup(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Candidates for a selection control currently showing `current`.
    ///
    /// A non-empty `current` outside the vocabulary is prepended so a legacy
    /// or custom value is always selectable. The default selection is the
    /// candidate equal to `current`, else index 0.
    pub fn presentation_list<'a>(&'a self, current: &'a str) -> Presentation<'a> {
        let mut candidates: Vec<&'a str> = Vec::with_capacity(self.names.len() + 1);
        if !current.is_empty() && !self.contains(current) {
            candidates.push(current);
        }
        candidates.extend(self.names.iter().map(String::as_str));

        let default_index = if current.is_empty() {
            0
        } else {
            candidates.iter().position(|c| *c == current).unwrap_or(0)
        };

        Presentation { candidates, default_index }
    }

    /// Put `name` into the slot. A recognized name also overwrites the id; an
    /// unrecognized one never invents or clears an id.
    pub fn select(&self, concept: &mut ConceptAnnotation, name: &str) -> Selection {
        concept.hpo_name = name.to_string();
        match self.exact_lookup(name) {
            Some(id) => {
                concept.hpo_id = id.to_string();
                Selection::Recognized { id: id.to_string() }
            }
            None => {
                tracing::debug!(name, kept_id = %concept.hpo_id, "custom concept name selected");
                Selection::Custom
            }
        }
    }
}
