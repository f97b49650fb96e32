use serde::{Deserialize, Serialize};

/// Identifies a pull request: owner, repository, number.
/// Built from CLI flags or extracted from a PR URL by parse_pr_url().
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// One file changed in a pull request, as returned by the
/// "list pull request files" endpoint.
///
/// GitHub reports `changes` as `additions + deletions`; we pass it through
/// without verifying the invariant.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root (e.g., "docs/setup.md")
    pub filename: String,
    /// Lines added in this file
    pub additions: u64,
    /// Lines deleted in this file
    pub deletions: u64,
    /// Total lines changed in this file
    pub changes: u64,
}

/// Request payload for the "create issue comment" endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub body: &'a str,
}

/// Request payload for the "add labels" endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LabelsRequest<'a> {
    pub labels: &'a [String],
}
