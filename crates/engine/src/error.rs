use std::fmt;

use annotator_io::DocumentError;
use annotator_recon::ReconError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Operation needs a loaded document.
    NoDocument,
    RecordOutOfRange { index: usize, len: usize },
    ConceptOutOfRange { record: usize, index: usize, len: usize },
    /// Session runs without the explicit modified control.
    OverrideControlDisabled,
    /// Session runs without the commentary field.
    CommentaryDisabled,
    /// Edit script could not be parsed.
    Script(String),
    /// Edit `index` of a script failed; earlier edits stay applied.
    AtEdit { index: usize, error: Box<EngineError> },
    Document(DocumentError),
    Recon(ReconError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => write!(f, "no document loaded"),
            Self::RecordOutOfRange { index, len } => {
                write!(f, "record {index} out of range ({len} record(s))")
            }
            Self::ConceptOutOfRange { record, index, len } => {
                write!(f, "record {record}: concept {index} out of range ({len} concept(s))")
            }
            Self::OverrideControlDisabled => write!(f, "modified control is disabled for this session"),
            Self::CommentaryDisabled => write!(f, "commentary is disabled for this session"),
            Self::Script(msg) => write!(f, "invalid edit script: {msg}"),
            Self::AtEdit { index, error } => write!(f, "edit #{}: {error}", index + 1),
            Self::Document(e) => write!(f, "{e}"),
            Self::Recon(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DocumentError> for EngineError {
    fn from(e: DocumentError) -> Self {
        Self::Document(e)
    }
}

impl From<ReconError> for EngineError {
    fn from(e: ReconError) -> Self {
        Self::Recon(e)
    }
}
