// Tab-separated vocabulary source: `name<TAB>id` per line, no header

use std::path::Path;

use annotator_core::VocabularyTerm;

use crate::error::LoadError;
use crate::text::{read_file_as_utf8, strip_bom};

pub fn load_vocabulary(path: &Path) -> Result<Vec<VocabularyTerm>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing { path: path.to_path_buf() });
    }
    let content = read_file_as_utf8(path)
        .map_err(|e| LoadError::Read { path: path.to_path_buf(), message: e.to_string() })?;
    let terms = parse_vocabulary(&content)?;
    tracing::info!(path = %path.display(), terms = terms.len(), "vocabulary source loaded");
    Ok(terms)
}

/// Parse vocabulary text. Blank lines are skipped; any other line must have
/// exactly two columns. Quotes are literal characters, not field delimiters.
pub fn parse_vocabulary(content: &str) -> Result<Vec<VocabularyTerm>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(strip_bom(content).as_bytes());

    let mut terms = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Csv(e.to_string()))?;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(LoadError::Malformed { line, fields: record.len() });
        }
        terms.push(VocabularyTerm::new(&record[0], &record[1]));
    }

    Ok(terms)
}
