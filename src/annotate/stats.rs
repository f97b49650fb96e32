use crate::github::ChangedFile;

/// Aggregate line-change statistics across all files in a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
}

/// Fold the changed files into a single DiffSummary, starting from a
/// zero-valued accumulator. The empty sequence yields all zeros.
pub fn summarize(files: &[ChangedFile]) -> DiffSummary {
    files.iter().fold(DiffSummary::default(), |mut acc, file| {
        acc.additions += file.additions;
        acc.deletions += file.deletions;
        acc.changes += file.changes;
        acc
    })
}

/// Render the summary comment body posted on the pull request.
pub fn comment_body(pr_number: u64, summary: &DiffSummary) -> String {
    format!(
        "Pull request #{} has been updated with:\n\
         - {} changes\n\
         - {} additions\n\
         - {} deletions\n",
        pr_number, summary.changes, summary.additions, summary.deletions
    )
}
