// Annotator CLI - review and correct phenotype annotations of clinical reports

mod exit_codes;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use annotator_config::Settings;
use annotator_engine::{EditOutcome, EditScript, EngineError, Session, SessionOptions};
use annotator_io::{load_vocabulary, read_document, write_document, DocumentError, ExportOptions};
use annotator_recon::{ConceptComparison, ReconcilePolicy};
use annotator_vocab::{LookupInconsistency, VocabularyIndex};

use exit_codes::{
    document_exit_code, engine_exit_code, EXIT_ERROR, EXIT_FINDINGS, EXIT_SUCCESS, EXIT_USAGE,
    EXIT_EDIT_SCRIPT, EXIT_VOCAB_NO_MATCH, EXIT_VOCAB_UNAVAILABLE,
};

#[derive(Parser)]
#[command(name = "annot")]
#[command(about = "Review phenotype annotations of clinical reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Tab-separated vocabulary source (name<TAB>id)
    #[arg(long, global = true, env = "ANNOTATOR_VOCAB", value_name = "TSV")]
    vocab: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/annotator/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Write log lines to stderr as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exact vocabulary lookup of a concept name
    #[command(after_help = "\
Examples:
  annot lookup Seizure --vocab hpo.tsv
  annot lookup 'Absence seizure' --json")]
    Lookup {
        /// Concept name, matched exactly (case and whitespace included)
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approximate search over vocabulary names
    #[command(after_help = "\
Examples:
  annot search 'seizur' --top 5
  annot search 'fievre recurrente' --min-score 0.8 --json")]
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of results (default: settings search.topN)
        #[arg(long)]
        top: Option<usize>,

        /// Drop results scoring below this (default: settings search.minScore)
        #[arg(long)]
        min_score: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show records, concepts, flags and candidate lists of a document
    Inspect {
        /// Annotation document (JSON)
        doc: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report stored concept ids that disagree with the vocabulary
    #[command(after_help = "\
Exit code 1 when at least one inconsistency is found.")]
    Audit {
        /// Annotation document (JSON)
        doc: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply an edit script to a document and export the result
    #[command(after_help = "\
Examples:
  annot edit CR_001.json --script fixes.json --author MB
  annot edit CR_001.json --script fixes.toml --out-dir reviewed/
  annot edit CR_001.json --script fixes.json --stdout > out.json
  annot edit CR_001.json --script fixes.json --in-place")]
    Edit {
        /// Annotation document (JSON)
        doc: PathBuf,

        /// Edit script (.json or .toml)
        #[arg(long)]
        script: PathBuf,

        /// Author identifier appended to the export file name
        #[arg(long, env = "ANNOTATOR_AUTHOR")]
        author: Option<String>,

        /// Directory for the export (default: next to the document)
        #[arg(long, conflicts_with = "stdout")]
        out_dir: Option<PathBuf>,

        /// Write the export to stdout instead of a file
        #[arg(long)]
        stdout: bool,

        /// Allow the export to replace the input document
        #[arg(long, conflicts_with = "stdout")]
        in_place: bool,

        /// Enable and export the commentary field
        #[arg(long)]
        commentary: bool,

        /// Run without the explicit modified control
        #[arg(long)]
        no_override_control: bool,

        /// Count added or removed concepts as modifications
        #[arg(long)]
        strict_concepts: bool,

        /// Print a JSON summary
        #[arg(long, conflicts_with = "stdout")]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Settings are read under a plain stderr subscriber so their warnings are
    // not lost before the configured one is installed.
    let settings = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match cli.settings.as_deref() {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        }
    });
    init_tracing(cli.log_json || settings.log_json);

    let vocab_path = cli.vocab.clone().or_else(|| settings.vocab_path.clone());
    let ctx = Context { settings, vocab_path };

    let result = match cli.command {
        Commands::Lookup { name, json } => cmd_lookup(&ctx, &name, json),
        Commands::Search { query, top, min_score, json } => {
            cmd_search(&ctx, &query, top, min_score, json)
        }
        Commands::Inspect { doc, json } => cmd_inspect(&ctx, &doc, json),
        Commands::Audit { doc, json } => cmd_audit(&ctx, &doc, json),
        Commands::Edit {
            doc,
            script,
            author,
            out_dir,
            stdout,
            in_place,
            commentary,
            no_override_control,
            strict_concepts,
            json,
        } => {
            let flags = EditFlags { commentary, no_override_control, strict_concepts };
            let author = author.or_else(|| ctx.settings.author().map(str::to_string));
            let target = if stdout { Target::Stdout } else { Target::Dir { dir: out_dir, in_place } };
            cmd_edit(&ctx, &doc, &script, author.as_deref(), target, flags, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("ANNOTATOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(io::stderr).finish()
}

/// Logs always go to stderr; stdout carries command output only.
fn init_tracing(log_json: bool) {
    let registry = tracing_subscriber::registry().with(env_filter());
    if log_json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Exit with `code` without printing anything; output already explains.
    pub fn silent(code: u8) -> Self {
        Self::new(code, "")
    }

    pub fn document(err: DocumentError) -> Self {
        Self::new(document_exit_code(&err), err.to_string())
    }

    pub fn engine(err: EngineError) -> Self {
        let code = engine_exit_code(&err);
        let hint = match &err {
            EngineError::OverrideControlDisabled => {
                Some("drop --no-override-control or set editor.overrideControl to true".to_string())
            }
            EngineError::CommentaryDisabled => Some("pass --commentary".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared
// ============================================================================

struct Context {
    settings: Settings,
    vocab_path: Option<PathBuf>,
}

impl Context {
    /// Vocabulary for commands that cannot work without one.
    fn require_vocabulary(&self) -> Result<VocabularyIndex, CliError> {
        let path = self.vocab_path.as_deref().ok_or_else(|| {
            CliError::new(EXIT_VOCAB_UNAVAILABLE, "no vocabulary source configured")
                .with_hint("pass --vocab <tsv>, set ANNOTATOR_VOCAB, or set vocab.path in settings")
        })?;
        let terms = load_vocabulary(path)
            .map_err(|e| CliError::new(EXIT_VOCAB_UNAVAILABLE, e.to_string()))?;
        Ok(VocabularyIndex::build(terms))
    }

    /// Vocabulary for document commands. Any problem degrades to an empty
    /// index: every concept name then reads as custom.
    fn vocabulary(&self) -> VocabularyIndex {
        let Some(path) = self.vocab_path.as_deref() else {
            tracing::warn!("no vocabulary source configured, all concept names are custom");
            return VocabularyIndex::empty();
        };
        match load_vocabulary(path) {
            Ok(terms) => VocabularyIndex::build(terms),
            Err(e) => {
                tracing::warn!(error = %e, "vocabulary unavailable, continuing with an empty index");
                VocabularyIndex::empty()
            }
        }
    }

    fn session_options(&self, flags: EditFlags) -> SessionOptions {
        let strict = flags.strict_concepts || self.settings.strict_concept_length;
        SessionOptions {
            policy: ReconcilePolicy {
                override_control: self.settings.override_control && !flags.no_override_control,
                concepts: if strict { ConceptComparison::Strict } else { ConceptComparison::CommonPrefix },
            },
            commentary: flags.commentary || self.settings.commentary,
        }
    }

    fn open_session(&self, doc: &Path, flags: EditFlags) -> Result<Session, CliError> {
        let document = read_document(doc).map_err(CliError::document)?;
        let mut session = Session::new(self.vocabulary(), self.session_options(flags));
        session.load(&source_name(doc), document);
        Ok(session)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct EditFlags {
    commentary: bool,
    no_override_control: bool,
    strict_concepts: bool,
}

enum Target {
    Stdout,
    /// `dir` defaults to the document's directory.
    Dir { dir: Option<PathBuf>, in_place: bool },
}

fn source_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Write exactly one JSON value to stdout.
fn emit_json(value: &serde_json::Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::io(e.to_string()))?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

fn emit_line(line: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", line).map_err(|e| CliError::io(e.to_string()))
}

fn inconsistency_json(item: &LookupInconsistency) -> serde_json::Value {
    json!({
        "record": item.record_index,
        "concept": item.concept_index,
        "hpoName": item.hpo_name,
        "storedId": item.stored_id,
        "expectedId": item.expected_id,
    })
}

// ============================================================================
// lookup
// ============================================================================

fn cmd_lookup(ctx: &Context, name: &str, json: bool) -> Result<(), CliError> {
    let index = ctx.require_vocabulary()?;
    let id = index.exact_lookup(name);

    if json {
        emit_json(&json!({ "name": name, "id": id }))?;
    } else if let Some(id) = id {
        emit_line(id)?;
    }

    match id {
        Some(_) => Ok(()),
        None if json => Err(CliError::silent(EXIT_VOCAB_NO_MATCH)),
        None => Err(CliError::new(EXIT_VOCAB_NO_MATCH, format!("no exact match for '{}'", name))
            .with_hint(format!("try: annot search '{}'", name))),
    }
}

// ============================================================================
// search
// ============================================================================

fn cmd_search(
    ctx: &Context,
    query: &str,
    top: Option<usize>,
    min_score: Option<f64>,
    json: bool,
) -> Result<(), CliError> {
    let min_score = min_score.unwrap_or(ctx.settings.search_min_score);
    if !(0.0..=1.0).contains(&min_score) {
        return Err(CliError::args(format!("--min-score must be within 0..=1, got {}", min_score)));
    }
    let top = top.unwrap_or(ctx.settings.search_top_n);

    let index = ctx.require_vocabulary()?;
    let matches = index.fuzzy_match(query, top, min_score);

    if json {
        let items: Vec<_> = matches
            .iter()
            .map(|m| json!({ "name": m.name, "id": index.exact_lookup(&m.name), "score": m.score }))
            .collect();
        return emit_json(&json!({ "query": query, "matches": items }));
    }

    for m in &matches {
        let id = index.exact_lookup(&m.name).unwrap_or("");
        emit_line(&format!("{:.3}\t{}\t{}", m.score, id, m.name))?;
    }
    Ok(())
}

// ============================================================================
// inspect
// ============================================================================

fn cmd_inspect(ctx: &Context, doc: &Path, json: bool) -> Result<(), CliError> {
    let session = ctx.open_session(doc, EditFlags::default())?;
    let statuses = session.statuses().map_err(CliError::engine)?;
    let inconsistencies = session.lookup_inconsistencies();

    if json {
        let mut records = Vec::with_capacity(statuses.len());
        for (record, status) in session.records().iter().zip(&statuses) {
            let mut concepts = Vec::with_capacity(record.concepts.len());
            for (ci, concept) in record.concepts.iter().enumerate() {
                let presentation =
                    session.presentation(status.index, ci).map_err(CliError::engine)?;
                concepts.push(json!({
                    "hpoId": concept.hpo_id,
                    "hpoName": concept.hpo_name,
                    "recognized": session.vocabulary().contains(&concept.hpo_name),
                    "candidates": presentation.candidates.len(),
                    "default": presentation.default_candidate(),
                }));
            }
            records.push(json!({
                "index": status.index,
                "sentence": record.sentence,
                "concerned_person": record.concerned_person,
                "negated": record.negated,
                "status": status,
                "concepts": concepts,
            }));
        }
        return emit_json(&json!({
            "source": session.source_name(),
            "vocabulary": session.vocabulary().len(),
            "records": records,
            "inconsistencies": inconsistencies.iter().map(inconsistency_json).collect::<Vec<_>>(),
        }));
    }

    emit_line(&format!(
        "{}: {} record(s), vocabulary {} term(s)",
        source_name(doc),
        statuses.len(),
        session.vocabulary().len()
    ))?;
    for (record, status) in session.records().iter().zip(&statuses) {
        emit_line(&format!(
            "[{}] modified={} control={} negated={} person={:?}",
            status.index, status.modified, status.control_position, record.negated, record.concerned_person
        ))?;
        emit_line(&format!("    {}", record.sentence))?;
        for concept in &record.concepts {
            let marker = if session.vocabulary().contains(&concept.hpo_name) { "" } else { " (custom)" };
            emit_line(&format!("    - {} {}{}", concept.hpo_id, concept.hpo_name, marker))?;
        }
    }
    for item in &inconsistencies {
        emit_line(&format!("inconsistent: {}", item))?;
    }
    Ok(())
}

// ============================================================================
// audit
// ============================================================================

fn cmd_audit(ctx: &Context, doc: &Path, json: bool) -> Result<(), CliError> {
    let session = ctx.open_session(doc, EditFlags::default())?;
    let found = session.lookup_inconsistencies();

    if json {
        emit_json(&json!({
            "source": session.source_name(),
            "inconsistencies": found.iter().map(inconsistency_json).collect::<Vec<_>>(),
        }))?;
    } else {
        for item in &found {
            emit_line(&item.to_string())?;
        }
    }

    if found.is_empty() {
        Ok(())
    } else if json {
        Err(CliError::silent(EXIT_FINDINGS))
    } else {
        Err(CliError::new(EXIT_FINDINGS, format!("{} lookup inconsistency(ies)", found.len())))
    }
}

// ============================================================================
// edit
// ============================================================================

fn cmd_edit(
    ctx: &Context,
    doc: &Path,
    script_path: &Path,
    author: Option<&str>,
    target: Target,
    flags: EditFlags,
    json: bool,
) -> Result<(), CliError> {
    let text = fs::read_to_string(script_path).map_err(|e| {
        CliError::new(EXIT_EDIT_SCRIPT, format!("cannot read {}: {}", script_path.display(), e))
    })?;
    let script = EditScript::from_path_and_text(script_path, &text).map_err(CliError::engine)?;
    let edit_count = script.len();

    let mut session = ctx.open_session(doc, flags)?;
    let outcomes = session.apply_script(script).map_err(CliError::engine)?;
    // Logged and counted; never corrected.
    let inconsistencies = session.lookup_inconsistencies().len();

    let (out_dir, in_place) = match target {
        Target::Stdout => {
            let export = session.export_json().map_err(CliError::engine)?;
            return emit_line(&export);
        }
        Target::Dir { dir: Some(dir), in_place } => (dir, in_place),
        Target::Dir { dir: None, in_place } => {
            (doc.parent().map(Path::to_path_buf).unwrap_or_default(), in_place)
        }
    };
    if !out_dir.as_os_str().is_empty() && !out_dir.is_dir() {
        return Err(CliError::args(format!("output directory not found: {}", out_dir.display())));
    }
    let file_name = session.export_file_name(author).map_err(CliError::engine)?;
    let output = out_dir.join(file_name);
    if !in_place && same_file(&output, doc) {
        return Err(CliError::args(format!("export would overwrite the input {}", doc.display()))
            .with_hint("pass --author, --out-dir or --stdout, or --in-place to replace it"));
    }

    let options = ExportOptions { include_commentary: session.options().commentary };
    let document = session.document().map_err(CliError::engine)?;
    write_document(&output, document, options).map_err(CliError::document)?;

    let modified = session.records().iter().filter(|r| r.modified).count();
    let inserted: Vec<usize> = outcomes
        .iter()
        .filter_map(|o| match o {
            EditOutcome::Inserted { position, .. } => Some(*position),
            _ => None,
        })
        .collect();

    if json {
        emit_json(&json!({
            "output": output.display().to_string(),
            "edits": edit_count,
            "records": session.records().len(),
            "modified": modified,
            "inserted": inserted,
            "inconsistencies": inconsistencies,
        }))
    } else {
        eprintln!(
            "Wrote {} ({} edit(s), {} record(s), {} modified, {} inconsistent concept id(s))",
            output.display(),
            edit_count,
            session.records().len(),
            modified,
            inconsistencies
        );
        Ok(())
    }
}

/// True when `output` names the same file as the existing `input`.
fn same_file(output: &Path, input: &Path) -> bool {
    let Ok(input) = fs::canonicalize(input) else {
        return false;
    };
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (fs::canonicalize(dir), output.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name) == input,
        _ => false,
    }
}
