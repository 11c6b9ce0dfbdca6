use std::path::Path;

/// Export filename: `{stem}_{author}.json`, or `{stem}.json` without an author.
///
/// `stem` is the original file name without its last extension. An author
/// that is empty or only whitespace counts as absent. Path separators in the
/// author become `_`, so the result is always a bare file name.
pub fn export_file_name(original_name: &str, author: Option<&str>) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "modified".to_string());

    match author.map(str::trim).filter(|a| !a.is_empty()) {
        Some(author) => format!("{stem}_{}.json", sanitize(author)),
        None => format!("{stem}.json"),
    }
}

fn sanitize(author: &str) -> String {
    author
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
