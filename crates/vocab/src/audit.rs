use annotator_core::{AnnotationRecord, RecordId};

use crate::index::VocabularyIndex;

/// A stored concept id that disagrees with the vocabulary entry for its name.
///
/// Reported, never corrected. Custom names are not inconsistencies: they have
/// no vocabulary entry to disagree with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupInconsistency {
    pub record_index: usize,
    pub record_id: RecordId,
    pub concept_index: usize,
    pub hpo_name: String,
    pub stored_id: String,
    pub expected_id: String,
}

impl std::fmt::Display for LookupInconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {}, concept {}: '{}' stored as '{}', vocabulary says '{}'",
            self.record_index + 1,
            self.concept_index + 1,
            self.hpo_name,
            self.stored_id,
            self.expected_id
        )
    }
}

impl VocabularyIndex {
    pub fn audit(&self, records: &[AnnotationRecord]) -> Vec<LookupInconsistency> {
        let mut found = Vec::new();
        for (record_index, record) in records.iter().enumerate() {
            for (concept_index, concept) in record.concepts.iter().enumerate() {
                let Some(expected) = self.exact_lookup(&concept.hpo_name) else {
                    continue;
                };
                if expected != concept.hpo_id {
                    found.push(LookupInconsistency {
                        record_index,
                        record_id: record.id,
                        concept_index,
                        hpo_name: concept.hpo_name.clone(),
                        stored_id: concept.hpo_id.clone(),
                        expected_id: expected.to_string(),
                    });
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_core::{ConceptAnnotation, VocabularyTerm};

    #[test]
    fn reports_mismatch_and_ignores_custom_names() {
        let idx = VocabularyIndex::build(vec![
            VocabularyTerm::new("Seizure", "HP:0001250"),
            VocabularyTerm::new("Fever", "HP:0001945"),
        ]);
        let records = vec![
            AnnotationRecord::new(
                "s1",
                "patient",
                false,
                false,
                vec![
                    ConceptAnnotation::new("HP:0001250", "Seizure"),
                    ConceptAnnotation::new("HP:0000000", "Fever"),
                ],
            ),
            AnnotationRecord::new(
                "s2",
                "mother",
                false,
                false,
                vec![ConceptAnnotation::new("HP:1234567", "Custom finding")],
            ),
        ];

        let found = idx.audit(&records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_index, 0);
        assert_eq!(found[0].concept_index, 1);
        assert_eq!(found[0].stored_id, "HP:0000000");
        assert_eq!(found[0].expected_id, "HP:0001945");
        assert_eq!(found[0].record_id, records[0].id);
    }

    #[test]
    fn empty_index_reports_nothing() {
        let records = vec![AnnotationRecord::new(
            "s",
            "",
            false,
            false,
            vec![ConceptAnnotation::new("HP:x", "Seizure")],
        )];
        assert!(VocabularyIndex::empty().audit(&records).is_empty());
    }
}
