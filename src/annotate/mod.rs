pub mod labels;
pub mod stats;

pub use stats::DiffSummary;

use thiserror::Error;
use tracing::{info, instrument};

use crate::github::{GitHubApi, GitHubError, PrRef};

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// The four invocation inputs, resolved from CLI flags, the PR URL, the
/// config file, and the environment before the pipeline starts.
#[derive(Debug, Clone)]
pub struct AnnotateInputs {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub token: String,
}

impl AnnotateInputs {
    /// Precondition check: every input must be present. Runs before any
    /// network call is attempted.
    fn validate(&self) -> Result<PrRef, AnnotateError> {
        if self.owner.is_empty() {
            return Err(AnnotateError::MissingInput("owner"));
        }
        if self.repo.is_empty() {
            return Err(AnnotateError::MissingInput("repo"));
        }
        if self.pr_number == 0 {
            return Err(AnnotateError::MissingInput("pr_number"));
        }
        if self.token.is_empty() {
            return Err(AnnotateError::MissingInput("token"));
        }
        Ok(PrRef {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number: self.pr_number,
        })
    }
}

/// What the run accomplished, for the terminal summary.
#[derive(Debug)]
pub struct Outcome {
    pub pr_number: u64,
    pub files_changed: usize,
    pub summary: DiffSummary,
    pub labels: Vec<String>,
}

/// The annotation pipeline: list changed files, post a summary comment,
/// then apply extension-derived labels.
///
/// Strictly sequential, comment before labels. The first error aborts the
/// remaining steps; side effects already performed are not undone.
#[instrument(skip(api, inputs), fields(owner = %inputs.owner, repo = %inputs.repo, pr = inputs.pr_number))]
pub async fn run(api: &dyn GitHubApi, inputs: &AnnotateInputs) -> Result<Outcome, AnnotateError> {
    let pr = inputs.validate()?;

    let files = api.list_changed_files(&pr).await?;
    info!(files = files.len(), "fetched changed files");

    let summary = stats::summarize(&files);
    let body = stats::comment_body(pr.number, &summary);
    api.create_comment(&pr, &body).await?;
    info!(
        additions = summary.additions,
        deletions = summary.deletions,
        changes = summary.changes,
        "posted summary comment"
    );

    let labels = labels::derive_labels(&files);
    api.add_labels(&pr, &labels).await?;
    info!(labels = labels.len(), "applied labels");

    Ok(Outcome {
        pr_number: pr.number,
        files_changed: files.len(),
        summary,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::ChangedFile;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// GitHubApi double that records call counts and submitted payloads,
    /// with per-step failure injection.
    #[derive(Default)]
    struct RecordingApi {
        files: Vec<ChangedFile>,
        fail_list: bool,
        fail_comment: bool,
        list_calls: AtomicUsize,
        comment_calls: AtomicUsize,
        label_calls: AtomicUsize,
        last_body: Mutex<Option<String>>,
        last_labels: Mutex<Option<Vec<String>>>,
    }

    fn injected_error() -> GitHubError {
        GitHubError::Status {
            status: 500,
            path: "/injected".to_string(),
        }
    }

    #[async_trait]
    impl GitHubApi for RecordingApi {
        async fn list_changed_files(&self, _pr: &PrRef) -> Result<Vec<ChangedFile>, GitHubError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(injected_error());
            }
            Ok(self.files.clone())
        }

        async fn create_comment(&self, _pr: &PrRef, body: &str) -> Result<(), GitHubError> {
            self.comment_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_comment {
                return Err(injected_error());
            }
            *self.last_body.lock().unwrap() = Some(body.to_string());
            Ok(())
        }

        async fn add_labels(&self, _pr: &PrRef, labels: &[String]) -> Result<(), GitHubError> {
            self.label_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_labels.lock().unwrap() = Some(labels.to_vec());
            Ok(())
        }
    }

    fn changed(filename: &str, additions: u64, deletions: u64) -> ChangedFile {
        ChangedFile {
            filename: filename.to_string(),
            additions,
            deletions,
            changes: additions + deletions,
        }
    }

    fn inputs() -> AnnotateInputs {
        AnnotateInputs {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            pr_number: 42,
            token: "t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_happy_path_worked_example() {
        let api = RecordingApi {
            files: vec![
                changed("README.md", 5, 1),
                changed("index.js", 10, 0),
                changed("index.js", 2, 2),
            ],
            ..Default::default()
        };

        let outcome = run(&api, &inputs()).await.unwrap();

        assert_eq!(outcome.pr_number, 42);
        assert_eq!(outcome.files_changed, 3);
        assert_eq!(outcome.summary.additions, 17);
        assert_eq!(outcome.summary.deletions, 3);
        assert_eq!(outcome.summary.changes, 20);
        assert_eq!(outcome.labels, vec!["javascript", "markdown"]);

        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.comment_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.label_calls.load(Ordering::SeqCst), 1);

        let body = api.last_body.lock().unwrap().clone().unwrap();
        assert!(body.contains("#42"));
        assert!(body.contains("- 20 changes"));
        assert!(body.contains("- 17 additions"));
        assert!(body.contains("- 3 deletions"));

        let labels = api.last_labels.lock().unwrap().clone().unwrap();
        assert_eq!(labels, vec!["javascript", "markdown"]);
    }

    #[tokio::test]
    async fn test_empty_pr_yields_zero_summary() {
        let api = RecordingApi::default();
        let outcome = run(&api, &inputs()).await.unwrap();
        assert_eq!(outcome.summary, DiffSummary::default());
        assert!(outcome.labels.is_empty());
        let body = api.last_body.lock().unwrap().clone().unwrap();
        assert!(body.contains("- 0 changes"));
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_any_call() {
        let missing = [
            AnnotateInputs { owner: String::new(), ..inputs() },
            AnnotateInputs { repo: String::new(), ..inputs() },
            AnnotateInputs { pr_number: 0, ..inputs() },
            AnnotateInputs { token: String::new(), ..inputs() },
        ];

        for bad in missing {
            let api = RecordingApi::default();
            let err = run(&api, &bad).await.unwrap_err();
            assert!(matches!(err, AnnotateError::MissingInput(_)));
            assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
            assert_eq!(api.comment_calls.load(Ordering::SeqCst), 0);
            assert_eq!(api.label_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_list_failure_prevents_both_writes() {
        let api = RecordingApi {
            fail_list: true,
            ..Default::default()
        };
        let err = run(&api, &inputs()).await.unwrap_err();
        assert!(matches!(err, AnnotateError::GitHub(_)));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.comment_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.label_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comment_failure_prevents_labels() {
        let api = RecordingApi {
            files: vec![changed("README.md", 1, 0)],
            fail_comment: true,
            ..Default::default()
        };
        let err = run(&api, &inputs()).await.unwrap_err();
        assert!(matches!(err, AnnotateError::GitHub(_)));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.comment_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.label_calls.load(Ordering::SeqCst), 0);
    }
}
