//! relnotes
//!
//! Composes release notes from the closed issues of a Jira project,
//! correlated with the local repository's history.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use relnotes_core::git::GitRepository;
use relnotes_core::models::{OnlineIssue, TrackerConfig};
use relnotes_core::IssueTracker;
use relnotes_jira::JiraIssueTracker;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "relnotes")]
#[command(about = "Compose release notes from closed Jira issues", long_about = None)]
struct Args {
    /// Path to the git repository to correlate against
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Jira server base url, e.g. https://jira.example.com
    #[arg(long)]
    jira_server: String,

    /// Username for Jira basic authentication
    #[arg(long)]
    username: Option<String>,

    /// Password or API token; looked up in the system keyring when omitted
    #[arg(long)]
    password: Option<String>,

    /// Project id used to synthesize the default closed-issue query
    #[arg(long)]
    jira_project_id: Option<String>,

    /// Explicit jql query; overrides the synthesized one
    #[arg(long)]
    jql: Option<String>,

    /// Regex applied to commit messages to pick up smart commit references
    #[arg(long)]
    smart_commits_format: Option<String>,

    /// Only include issues updated after this instant (RFC 3339)
    #[arg(long)]
    since: Option<DateTime<Utc>>,

    /// Exclude commits reachable from this reference (tag, branch or hash)
    #[arg(long)]
    since_commit: Option<String>,

    /// Write the notes to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(&args.log_level)
        .init();

    let password = match args.password.clone() {
        Some(password) => Some(password),
        None => keyring_password(args.username.as_deref())?,
    };

    let config = TrackerConfig {
        server: args.jira_server.clone(),
        username: args.username.clone(),
        password,
        project_id: args.jira_project_id.clone(),
        jql: args.jql.clone(),
        smart_commits_pattern: args.smart_commits_format.clone(),
    };

    let repository = GitRepository::new(args.repo.clone());
    let tracker = JiraIssueTracker::new(config, repository);

    if !tracker.verify_configuration() {
        bail!("Invalid tracker configuration, see the messages above");
    }

    let issues = tracker.closed_issues(args.since, args.since_commit.as_deref())?;
    tracing::info!("Composing notes for {} issues", issues.len());

    let notes = render_notes(&issues);
    match &args.output {
        Some(path) => fs::write(path, notes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", notes),
    }

    Ok(())
}

/// Falls back to the system keyring for the Jira password when the flag is
/// omitted; absence of an entry is not an error.
fn keyring_password(username: Option<&str>) -> Result<Option<String>> {
    let Some(username) = username else {
        return Ok(None);
    };

    let entry = keyring::Entry::new("relnotes-jira", username)?;
    match entry.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err).context("Failed to read the Jira password from the keyring"),
    }
}

fn render_notes(issues: &[OnlineIssue]) -> String {
    let mut notes = String::from("# Release notes\n\n");
    for issue in issues {
        let closed = issue
            .date_closed
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "date unknown".to_string());
        notes.push_str(&format!(
            "- [{}]({}) {} ({})\n",
            issue.id, issue.html_url, issue.title, closed
        ));
    }
    notes
}
