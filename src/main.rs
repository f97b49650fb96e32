mod annotate;
mod config;
mod github;

use clap::Parser;
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// PR Annotator — posts a line-change summary comment on a GitHub Pull
/// Request and applies labels derived from the changed files' extensions.
#[derive(Parser, Debug)]
#[command(name = "pr-annotator", version, about)]
struct Cli {
    /// GitHub Pull Request URL (e.g., https://github.com/org/repo/pull/42)
    ///
    /// Alternative to passing --owner, --repo and --pr-number separately.
    pr_url: Option<String>,

    /// Account or organization owning the repository
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// Pull request number
    #[arg(long)]
    pr_number: Option<u64>,

    /// GitHub token; falls back to .pr-annotator.toml, then GITHUB_TOKEN
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let (owner, repo, pr_number) = if let Some(url) = cli.pr_url.as_deref() {
        info!("parsing PR URL");
        let pr = github::parse_pr_url(url)?;
        debug!(owner = %pr.owner, repo = %pr.repo, pr = pr.number, "parsed PR URL");
        (pr.owner, pr.repo, pr.number)
    } else {
        // Absent flags become empty values; the pipeline's precondition
        // check rejects them before any network call.
        (
            cli.owner.unwrap_or_default(),
            cli.repo.unwrap_or_default(),
            cli.pr_number.unwrap_or_default(),
        )
    };

    let token = cli
        .token
        .or_else(|| config.github_token())
        .unwrap_or_default();

    let inputs = annotate::AnnotateInputs {
        owner,
        repo,
        pr_number,
        token,
    };

    let client = github::GitHubClient::new(config.api_url(), &inputs.token);

    info!("annotating pull request");
    let outcome = annotate::run(&client, &inputs).await?;
    info!(pr = outcome.pr_number, labels = outcome.labels.len(), "done");

    println!(
        "{} PR #{} annotated: {} files changed, +{} -{} ({} changes)",
        "✓".green().bold(),
        outcome.pr_number,
        outcome.files_changed,
        outcome.summary.additions,
        outcome.summary.deletions,
        outcome.summary.changes,
    );
    if outcome.labels.is_empty() {
        println!("Labels: {}", "none".dimmed());
    } else {
        println!("Labels: {}", outcome.labels.join(", ").cyan());
    }

    Ok(())
}
