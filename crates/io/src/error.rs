use std::fmt;
use std::path::PathBuf;

/// Vocabulary source could not be used. Callers degrade to an empty index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No file at the configured path.
    Missing { path: PathBuf },
    /// File exists but could not be read.
    Read { path: PathBuf, message: String },
    /// A line without exactly two tab-separated columns.
    Malformed { line: u64, fields: usize },
    /// Tokenizer error from the tab-separated reader.
    Csv(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "vocabulary source not found: {}", path.display()),
            Self::Read { path, message } => {
                write!(f, "cannot read vocabulary source {}: {message}", path.display())
            }
            Self::Malformed { line, fields } => {
                write!(f, "vocabulary line {line}: expected 2 tab-separated columns, found {fields}")
            }
            Self::Csv(msg) => write!(f, "vocabulary parse error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Input file could not be read.
    Read { path: PathBuf, message: String },
    /// Input is not a valid annotation document. No partial document is kept.
    Parse(String),
    /// Export could not be rendered.
    Serialize(String),
    /// Export could not be written.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "invalid annotation document: {msg}"),
            Self::Serialize(msg) => write!(f, "JSON serialization error: {msg}"),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for DocumentError {}
