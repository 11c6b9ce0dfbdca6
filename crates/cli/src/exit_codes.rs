//! CLI Exit Code Registry
//!
//! Single source of truth for `annot` exit codes. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain      | Description                                  |
//! |---------|-------------|----------------------------------------------|
//! | 0       | Universal   | Success                                      |
//! | 1       | Universal   | General error, or findings reported (audit)  |
//! | 2       | Universal   | Usage error (bad args, conflicting options)  |
//! | 3-9     | document    | Annotation document read/parse/write         |
//! | 10-19   | vocabulary  | Vocabulary source and lookups                |
//! | 20-29   | edit        | Edit scripts and their application           |

use annotator_engine::EngineError;
use annotator_io::DocumentError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Command completed.
pub const EXIT_SUCCESS: u8 = 0;

/// Unspecified failure. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// `audit` found lookup inconsistencies.
pub const EXIT_FINDINGS: u8 = 1;

/// Bad arguments.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Document (3-9)
// =============================================================================

/// Document file could not be read.
pub const EXIT_DOC_READ: u8 = 3;

/// Document is not a valid annotation document.
pub const EXIT_DOC_PARSE: u8 = 4;

/// Export could not be rendered or written.
pub const EXIT_DOC_WRITE: u8 = 5;

// =============================================================================
// Vocabulary (10-19)
// =============================================================================

/// Vocabulary source missing or malformed, and the command needs one.
pub const EXIT_VOCAB_UNAVAILABLE: u8 = 10;

/// `lookup` found no exact match.
pub const EXIT_VOCAB_NO_MATCH: u8 = 11;

// =============================================================================
// Edit (20-29)
// =============================================================================

/// Edit script could not be read or parsed.
pub const EXIT_EDIT_SCRIPT: u8 = 20;

/// An edit was rejected (bad position, disabled control).
pub const EXIT_EDIT_REJECTED: u8 = 21;

/// Map a document error to its exit code.
pub fn document_exit_code(err: &DocumentError) -> u8 {
    match err {
        DocumentError::Read { .. } => EXIT_DOC_READ,
        DocumentError::Parse(_) => EXIT_DOC_PARSE,
        DocumentError::Serialize(_) | DocumentError::Write { .. } => EXIT_DOC_WRITE,
    }
}

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::Document(e) => document_exit_code(e),
        EngineError::Script(_) => EXIT_EDIT_SCRIPT,
        EngineError::AtEdit { error, .. } => engine_exit_code(error),
        EngineError::NoDocument => EXIT_ERROR,
        EngineError::RecordOutOfRange { .. }
        | EngineError::ConceptOutOfRange { .. }
        | EngineError::OverrideControlDisabled
        | EngineError::CommentaryDisabled
        | EngineError::Recon(_) => EXIT_EDIT_REJECTED,
    }
}
