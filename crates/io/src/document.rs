// Annotation document JSON import/export

use std::fs;
use std::path::Path;

use annotator_core::{AnnotationRecord, ConceptAnnotation, Document};
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::text::strip_bom;

// ---------------------------------------------------------------------------
// Wire shape (input)
// ---------------------------------------------------------------------------
//
// Every field is optional: absent or null reads as its default. Wrong types
// are parse errors. Unknown fields are dropped.

#[derive(Debug, Deserialize)]
struct WireDocument {
    annotations: Option<Vec<WireAnnotation>>,
    commentary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAnnotation {
    sentence: Option<String>,
    concerned_person: Option<String>,
    negated: Option<bool>,
    modifications: Option<bool>,
    #[serde(rename = "hpoAnnotation")]
    hpo_annotation: Option<Vec<WireConcept>>,
}

#[derive(Debug, Deserialize)]
struct WireConcept {
    #[serde(rename = "hpoId")]
    hpo_id: Option<String>,
    #[serde(rename = "hpoName")]
    hpo_name: Option<String>,
}

impl From<WireAnnotation> for AnnotationRecord {
    fn from(wire: WireAnnotation) -> Self {
        let concepts = wire
            .hpo_annotation
            .unwrap_or_default()
            .into_iter()
            .map(|c| ConceptAnnotation::new(c.hpo_id.unwrap_or_default(), c.hpo_name.unwrap_or_default()))
            .collect();

        AnnotationRecord::new(
            wire.sentence.unwrap_or_default(),
            wire.concerned_person.unwrap_or_default(),
            wire.negated.unwrap_or(false),
            wire.modifications.unwrap_or(false),
            concepts,
        )
    }
}

// ---------------------------------------------------------------------------
// Wire shape (output)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ExportDocument<'a> {
    annotations: Vec<ExportAnnotation<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commentary: Option<&'a str>,
}

#[derive(Serialize)]
struct ExportAnnotation<'a> {
    sentence: &'a str,
    concerned_person: &'a str,
    negated: bool,
    modifications: bool,
    #[serde(rename = "hpoAnnotation")]
    hpo_annotation: &'a [ConceptAnnotation],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Emit the `commentary` field.
    pub include_commentary: bool,
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse a document. Each record gets a fresh session id.
pub fn parse_document(text: &str) -> Result<Document, DocumentError> {
    let wire: WireDocument =
        serde_json::from_str(strip_bom(text)).map_err(|e| DocumentError::Parse(e.to_string()))?;

    let records: Vec<AnnotationRecord> =
        wire.annotations.unwrap_or_default().into_iter().map(AnnotationRecord::from).collect();

    Ok(Document { records, commentary: wire.commentary.unwrap_or_default() })
}

pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let text = fs::read_to_string(path)
        .map_err(|e| DocumentError::Read { path: path.to_path_buf(), message: e.to_string() })?;
    parse_document(&text)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Render with 4-space indentation, non-ASCII kept verbatim. Record ids are
/// session-local and never written.
pub fn to_json_string(doc: &Document, options: ExportOptions) -> Result<String, DocumentError> {
    let export = ExportDocument {
        annotations: doc
            .records
            .iter()
            .map(|r| ExportAnnotation {
                sentence: &r.sentence,
                concerned_person: &r.concerned_person,
                negated: r.negated,
                modifications: r.modified,
                hpo_annotation: &r.concepts,
            })
            .collect(),
        commentary: options.include_commentary.then_some(doc.commentary.as_str()),
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    export.serialize(&mut ser).map_err(|e| DocumentError::Serialize(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| DocumentError::Serialize(e.to_string()))
}

pub fn write_document(path: &Path, doc: &Document, options: ExportOptions) -> Result<(), DocumentError> {
    let json = to_json_string(doc, options)?;
    fs::write(path, json)
        .map_err(|e| DocumentError::Write { path: path.to_path_buf(), message: e.to_string() })?;
    tracing::info!(path = %path.display(), records = doc.records.len(), "document exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "annotations": [
            {
                "sentence": "Le patient présente des crises.",
                "concerned_person": "patient",
                "negated": false,
                "modifications": true,
                "hpoAnnotation": [
                    {"hpoId": "HP:0001250", "hpoName": "Seizure"},
                    {"hpoId": "HP:0001945", "hpoName": "Fever"}
                ],
                "start": 12
            },
            {
                "sentence": "Pas de fièvre chez la mère."
            }
        ]
    }"#;

    #[test]
    fn missing_fields_take_defaults() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(doc.records.len(), 2);

        let first = &doc.records[0];
        assert!(first.modified);
        assert_eq!(first.concepts.len(), 2);
        assert_eq!(first.concepts[1], ConceptAnnotation::new("HP:0001945", "Fever"));

        let second = &doc.records[1];
        assert_eq!(second.concerned_person, "");
        assert!(!second.negated);
        assert!(!second.modified);
        assert!(second.concepts.is_empty());
        assert_eq!(doc.commentary, "");
    }

    #[test]
    fn nulls_read_as_defaults() {
        let doc = parse_document(
            r#"{"annotations":[{"sentence":null,"negated":null,"hpoAnnotation":[{"hpoId":null,"hpoName":"X"}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.records[0].sentence, "");
        assert_eq!(doc.records[0].concepts[0], ConceptAnnotation::new("", "X"));
    }

    #[test]
    fn missing_annotations_is_empty_document() {
        let doc = parse_document("{}").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn invalid_input_is_parse_error() {
        assert!(matches!(parse_document("{not json"), Err(DocumentError::Parse(_))));
        assert!(matches!(parse_document("[]"), Err(DocumentError::Parse(_))));
        assert!(matches!(
            parse_document(r#"{"annotations":[{"negated":"yes"}]}"#),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn record_ids_are_unique() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_ne!(doc.records[0].id, doc.records[1].id);
    }

    #[test]
    fn export_shape_and_field_names() {
        let doc = parse_document(SAMPLE).unwrap();
        let json = to_json_string(&doc, ExportOptions::default()).unwrap();
        let val: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &val["annotations"][0];
        assert_eq!(first["modifications"], serde_json::json!(true));
        assert_eq!(first["hpoAnnotation"][0]["hpoId"], "HP:0001250");
        assert!(first.get("hpoAnnotations").is_none());
        assert!(first.get("id").is_none());
        assert!(first.get("start").is_none());
        assert_eq!(val["annotations"][1]["modifications"], serde_json::json!(false));
        assert!(val.get("commentary").is_none());
    }

    #[test]
    fn export_indents_four_spaces_and_keeps_accents() {
        let doc = parse_document(SAMPLE).unwrap();
        let json = to_json_string(&doc, ExportOptions::default()).unwrap();
        assert!(json.starts_with("{\n    \"annotations\": ["));
        assert!(json.contains("présente"));
        assert!(!json.contains("\\u00e9"));
    }

    #[test]
    fn export_field_order() {
        let doc = parse_document(SAMPLE).unwrap();
        let json = to_json_string(&doc, ExportOptions::default()).unwrap();
        let pos = |k: &str| json.find(k).unwrap();
        assert!(pos("\"sentence\"") < pos("\"concerned_person\""));
        assert!(pos("\"concerned_person\"") < pos("\"negated\""));
        assert!(pos("\"negated\"") < pos("\"modifications\""));
        assert!(pos("\"modifications\"") < pos("\"hpoAnnotation\""));
    }

    #[test]
    fn commentary_only_when_enabled() {
        let mut doc = parse_document(SAMPLE).unwrap();
        doc.commentary = "Relu, RAS.".into();
        let json = to_json_string(&doc, ExportOptions { include_commentary: true }).unwrap();
        let val: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val["commentary"], "Relu, RAS.");
    }

    #[test]
    fn zero_edit_round_trip_preserves_concepts() {
        let doc = parse_document(SAMPLE).unwrap();
        let json = to_json_string(&doc, ExportOptions::default()).unwrap();
        let again = parse_document(&json).unwrap();
        for (a, b) in doc.records.iter().zip(&again.records) {
            assert_eq!(a.concepts, b.concepts);
            assert_eq!(a.sentence, b.sentence);
            assert_eq!(a.modified, b.modified);
        }
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let doc = parse_document(SAMPLE).unwrap();

        write_document(&path, &doc, ExportOptions::default()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("hpoAnnotation"));

        let back = read_document(&path).unwrap();
        assert_eq!(back.records.len(), 2);
    }

    #[test]
    fn read_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = read_document(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
