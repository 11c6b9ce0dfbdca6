//! Edits: one user interaction each.
//!
//! Records and concepts are addressed by 0-based position in the live
//! document. Scripts are ordered lists of edits, written as JSON
//! (`{"edits": [...]}` or a bare array) or TOML (`[[edits]]` tables).

use annotator_core::RecordId;
use annotator_recon::ControlChoice;
use annotator_vocab::Selection;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    SetSentence {
        record: usize,
        value: String,
    },
    SetConcernedPerson {
        record: usize,
        value: String,
    },
    SetNegated {
        record: usize,
        value: bool,
    },
    /// Free-text id edit. No vocabulary involvement.
    SetConceptId {
        record: usize,
        concept: usize,
        value: String,
    },
    /// Pick a concept name; a recognized name also sets the id.
    SelectConcept {
        record: usize,
        concept: usize,
        name: String,
    },
    /// Append an empty concept slot.
    AddConcept {
        record: usize,
    },
    RemoveConcept {
        record: usize,
        concept: usize,
    },
    /// Explicit choice on the modified control.
    SetModified {
        record: usize,
        value: ControlChoice,
    },
    /// Insert a blank record after `record`.
    InsertAfter {
        record: usize,
    },
    SetCommentary {
        value: String,
    },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetSentence { .. } => "set_sentence",
            Self::SetConcernedPerson { .. } => "set_concerned_person",
            Self::SetNegated { .. } => "set_negated",
            Self::SetConceptId { .. } => "set_concept_id",
            Self::SelectConcept { .. } => "select_concept",
            Self::AddConcept { .. } => "add_concept",
            Self::RemoveConcept { .. } => "remove_concept",
            Self::SetModified { .. } => "set_modified",
            Self::InsertAfter { .. } => "insert_after",
            Self::SetCommentary { .. } => "set_commentary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Selected(Selection),
    Inserted { position: usize, id: RecordId },
}

/// An object script must carry exactly one `edits` list; anything else is
/// rejected rather than read as an empty script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    pub edits: Vec<Edit>,
}

impl EditScript {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| EngineError::Script(e.to_string()))?;
        let wraps_edits = value.as_object().is_some_and(|map| map.contains_key("edits"));
        if value.is_array() {
            let edits = serde_json::from_value(value).map_err(|e| EngineError::Script(e.to_string()))?;
            Ok(Self { edits })
        } else if wraps_edits {
            serde_json::from_value(value).map_err(|e| EngineError::Script(e.to_string()))
        } else {
            Err(EngineError::Script(
                "expected an array of edits or an object with an \"edits\" array".to_string(),
            ))
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Script(e.to_string()))
    }

    /// Pick the parser by file extension; anything but `.toml` is JSON.
    pub fn from_path_and_text(path: &std::path::Path, text: &str) -> Result<Self, EngineError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml(text),
            _ => Self::from_json(text),
        }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn json_wrapped_and_bare() {
        let wrapped = EditScript::from_json(
            r#"{"edits": [{"op": "set_sentence", "record": 0, "value": "B"}]}"#,
        )
        .unwrap();
        let bare = EditScript::from_json(r#"[{"op": "set_sentence", "record": 0, "value": "B"}]"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.edits[0], Edit::SetSentence { record: 0, value: "B".into() });
    }

    #[test]
    fn toml_tables() {
        let script = EditScript::from_toml(
            r#"
[[edits]]
op = "select_concept"
record = 1
concept = 0
name = "Fever"

[[edits]]
op = "set_modified"
record = 1
value = "no"

[[edits]]
op = "insert_after"
record = 1
"#,
        )
        .unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.edits[1], Edit::SetModified { record: 1, value: ControlChoice::No });
        assert_eq!(script.edits[2], Edit::InsertAfter { record: 1 });
    }

    #[test]
    fn extension_selects_parser() {
        let toml = "[[edits]]\nop = \"set_commentary\"\nvalue = \"ok\"\n";
        let script = EditScript::from_path_and_text(Path::new("e.TOML"), toml).unwrap();
        assert_eq!(script.edits[0], Edit::SetCommentary { value: "ok".into() });

        let json = r#"[{"op": "add_concept", "record": 2}]"#;
        let script = EditScript::from_path_and_text(Path::new("e.json"), json).unwrap();
        assert_eq!(script.edits[0].name(), "add_concept");
    }

    #[test]
    fn unknown_op_is_script_error() {
        let err = EditScript::from_json(r#"[{"op": "delete_everything"}]"#).unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));
    }

    #[test]
    fn bare_edit_object_is_script_error() {
        let err = EditScript::from_json(r#"{"op": "set_sentence", "record": 0, "value": "B"}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));
    }

    #[test]
    fn misspelled_edits_key_is_script_error() {
        let err = EditScript::from_json(
            r#"{"edit": [{"op": "set_sentence", "record": 0, "value": "B"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));

        let err = EditScript::from_json(r#"{"edits": [], "edit": []}"#).unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));
    }

    #[test]
    fn misspelled_toml_table_is_script_error() {
        let toml = "[[edit]]\nop = \"set_sentence\"\nrecord = 0\nvalue = \"B\"\n";
        let err = EditScript::from_toml(toml).unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));
    }

    #[test]
    fn empty_edit_list_is_allowed() {
        assert!(EditScript::from_json("[]").unwrap().is_empty());
        assert!(EditScript::from_json(r#"{"edits": []}"#).unwrap().is_empty());
    }

    #[test]
    fn negative_position_is_script_error() {
        let err = EditScript::from_json(r#"[{"op": "add_concept", "record": -1}]"#).unwrap_err();
        assert!(matches!(err, EngineError::Script(_)));
    }
}
