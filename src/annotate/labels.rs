use std::collections::BTreeSet;

use crate::github::ChangedFile;

/// Classify a filename by its extension, the segment after the last `.`.
///
/// Case-sensitive exact match: `md` → markdown, `js` → javascript,
/// `yml`/`yaml` → yaml, everything else (including filenames with no dot)
/// → noextension.
pub fn label_for(filename: &str) -> &'static str {
    // rsplit always yields at least one segment, so a dotless filename
    // falls through to the default arm.
    let extension = filename.rsplit('.').next().unwrap_or(filename);
    match extension {
        "md" => "markdown",
        "js" => "javascript",
        "yml" | "yaml" => "yaml",
        _ => "noextension",
    }
}

/// Derive the deduplicated label set for a sequence of changed files.
/// Sorted order is an implementation convenience; callers only rely on
/// uniqueness.
pub fn derive_labels(files: &[ChangedFile]) -> Vec<String> {
    files
        .iter()
        .map(|file| label_for(&file.filename).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
