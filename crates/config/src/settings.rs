// Annotator settings
// Loaded from ~/.config/annotator/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Author
    #[serde(rename = "author.initial")]
    pub author_initial: String,

    // Vocabulary
    #[serde(rename = "vocab.path")]
    pub vocab_path: Option<PathBuf>,

    // Editor
    #[serde(rename = "editor.overrideControl")]
    pub override_control: bool,

    #[serde(rename = "editor.commentary")]
    pub commentary: bool,

    // Reconciliation
    #[serde(rename = "recon.strictConceptLength")]
    pub strict_concept_length: bool,

    // Search
    #[serde(rename = "search.topN")]
    pub search_top_n: usize,

    #[serde(rename = "search.minScore")]
    pub search_min_score: f64,

    // Logging
    #[serde(rename = "log.json")]
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            author_initial: String::new(),
            vocab_path: None,
            override_control: true,
            commentary: false,
            strict_concept_length: false,
            search_top_n: 10,
            search_min_score: 0.0,
            log_json: false,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Author initial appended to exported file names
    "author.initial": "",

    // Tab-separated vocabulary source (name<TAB>id)
    "vocab.path": null,

    // Records carry an explicit yes/no modified control
    "editor.overrideControl": true,

    // Export includes the free-text commentary
    "editor.commentary": false,

    // Count added/removed concepts as modifications
    "recon.strictConceptLength": false,

    // Fuzzy search
    "search.topN": 10,
    "search.minScore": 0.0,

    // JSON log lines on stderr
    "log.json": false
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("annotator")
            .join("settings.json")
    }

    /// Load settings from the default location, creating a commented default
    /// file on first run
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults. A missing file is
    /// silent; an unreadable or invalid one is logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Author initial, or `None` when unset or blank
    pub fn author(&self) -> Option<&str> {
        Some(self.author_initial.trim()).filter(|a| !a.is_empty())
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "cannot create config directory");
                return;
            }
        }
        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            tracing::warn!(error = %e, "cannot write default settings.json");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults() {
        assert_eq!(Settings::parse(DEFAULT_FILE).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = Settings::parse(r#"{"author.initial": "MB", "editor.commentary": true}"#).unwrap();
        assert_eq!(s.author(), Some("MB"));
        assert!(s.commentary);
        assert!(s.override_control);
        assert_eq!(s.search_top_n, 10);
    }

    #[test]
    fn blank_author_is_none() {
        let s = Settings { author_initial: "  ".into(), ..Settings::default() };
        assert_eq!(s.author(), None);
    }

    #[test]
    fn missing_or_invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("absent.json")), Settings::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&bad), Settings::default());
    }

    #[test]
    fn serialized_keys_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = Settings {
            author_initial: "JD".into(),
            vocab_path: Some(PathBuf::from("/data/hpo.tsv")),
            strict_concept_length: true,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert!(json.contains("\"recon.strictConceptLength\": true"));
        fs::write(&path, json).unwrap();
        assert_eq!(Settings::load_from(&path), s);
    }
}
