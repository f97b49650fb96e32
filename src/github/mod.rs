pub mod types;

pub use types::{ChangedFile, PrRef};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use types::{CommentRequest, LabelsRequest};

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Invalid PR URL: {0}")]
    InvalidUrl(String),
}

/// The three GitHub operations the annotator performs.
/// A seam for testing: the pipeline talks to this trait, not to reqwest.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// List all files changed in the pull request, across all pages.
    async fn list_changed_files(&self, pr: &PrRef) -> Result<Vec<ChangedFile>, GitHubError>;

    /// Create a comment on the pull request's issue thread.
    async fn create_comment(&self, pr: &PrRef, body: &str) -> Result<(), GitHubError>;

    /// Add labels to the pull request.
    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<(), GitHubError>;
}

/// Parse a GitHub PR URL into its component parts.
///
/// Expected format: https://github.com/{owner}/{repo}/pull/{number}
/// Returns GitHubError::InvalidUrl for malformed URLs.
pub fn parse_pr_url(url: &str) -> Result<PrRef, GitHubError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| GitHubError::InvalidUrl(url.to_string()))?;

    if parsed.host_str() != Some("github.com") {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(|| GitHubError::InvalidUrl(url.to_string()))?
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() != 4 || segments[2] != "pull" {
        return Err(GitHubError::InvalidUrl(url.to_string()));
    }

    let number = segments[3]
        .parse::<u64>()
        .map_err(|_| GitHubError::InvalidUrl(url.to_string()))?;

    Ok(PrRef {
        owner: segments[0].to_string(),
        repo: segments[1].to_string(),
        number,
    })
}

/// GitHub REST API page size for the list-files endpoint.
const PER_PAGE: usize = 100;

/// reqwest-backed implementation of GitHubApi against the GitHub REST API.
/// The base URL is configurable so tests (and GitHub Enterprise) can point
/// it elsewhere.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        GitHubClient {
            http: reqwest::Client::new(),
            api_url,
            token: token.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .header("User-Agent", "pr-annotator")
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }

    /// Map a non-2xx response to GitHubError::Status, keeping the request
    /// path for the error message.
    fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, GitHubError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(GitHubError::Status {
                status: response.status().as_u16(),
                path: path.to_string(),
            })
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    async fn list_changed_files(&self, pr: &PrRef) -> Result<Vec<ChangedFile>, GitHubError> {
        let path = format!("/repos/{}/{}/pulls/{}/files", pr.owner, pr.repo, pr.number);

        let mut files = Vec::new();
        let mut page = 1u32;
        loop {
            debug!(page, "fetching changed files page");
            let response = self
                .request(reqwest::Method::GET, &path)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?;
            let response = Self::check_status(response, &path)?;

            let batch = response.json::<Vec<ChangedFile>>().await?;
            let batch_len = batch.len();
            files.extend(batch);

            // A short page means we've reached the last one.
            if batch_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!(files = files.len(), "fetched all changed files");
        Ok(files)
    }

    #[instrument(skip(self, body), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    async fn create_comment(&self, pr: &PrRef, body: &str) -> Result<(), GitHubError> {
        let path = format!("/repos/{}/{}/issues/{}/comments", pr.owner, pr.repo, pr.number);

        debug!(body_bytes = body.len(), "posting comment");
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&CommentRequest { body })
            .send()
            .await?;
        Self::check_status(response, &path)?;
        Ok(())
    }

    #[instrument(skip(self, labels), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<(), GitHubError> {
        let path = format!("/repos/{}/{}/issues/{}/labels", pr.owner, pr.repo, pr.number);

        debug!(labels = labels.len(), "adding labels");
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&LabelsRequest { labels })
            .send()
            .await?;
        Self::check_status(response, &path)?;
        Ok(())
    }
}
