//! `IssueTracker` implementation for Jira
//!
//! Validates the configuration before anything touches the network, picks
//! the retrieval strategy, and materializes the lazy result sequences for
//! the caller.

use crate::auth::Credentials;
use crate::client::JiraApi;
use crate::query::{jql_with_since, ClosedIssues};
use crate::smart_commits::SmartCommitIssues;
use crate::transport::{HttpTransport, Transport};
use chrono::{DateTime, Utc};
use relnotes_core::git::CommitLog;
use relnotes_core::models::{OnlineIssue, TrackerConfig};
use relnotes_core::{Error as CoreError, IssueTracker};

pub struct JiraIssueTracker<T, L> {
    config: TrackerConfig,
    transport: T,
    commits: L,
}

/// Configuration after validation: everything the strategies need, with
/// the default query already synthesized.
struct ResolvedSettings {
    server: String,
    username: String,
    password: String,
    strategy: Strategy,
}

enum Strategy {
    /// Scan commit messages with this pattern.
    SmartCommits(String),
    /// Run this jql against the search endpoint.
    Query(String),
}

impl<L: CommitLog> JiraIssueTracker<HttpTransport, L> {
    pub fn new(config: TrackerConfig, commits: L) -> Self {
        Self::with_transport(config, HttpTransport::new(), commits)
    }
}

impl<T: Transport, L: CommitLog> JiraIssueTracker<T, L> {
    pub fn with_transport(config: TrackerConfig, transport: T, commits: L) -> Self {
        Self {
            config,
            transport,
            commits,
        }
    }

    /// One check per field, first failure wins; the message names the
    /// flag the operator has to fix.
    fn resolve_settings(&self) -> std::result::Result<ResolvedSettings, String> {
        let server = self.config.server.trim();
        if server.is_empty() || reqwest::Url::parse(server).is_err() {
            return Err("A valid Jira server must be specified [--jira-server]".to_string());
        }

        if !self.config.has_issue_selector() {
            return Err(
                "A Jira project id is required when neither a jql query nor a smart commits \
                 pattern is given [--jira-project-id]"
                    .to_string(),
            );
        }

        let Some(username) = self.config.username() else {
            return Err("A username is required to authenticate with Jira [--username]".to_string());
        };
        let Some(password) = self.config.password() else {
            return Err("A password is required to authenticate with Jira [--password]".to_string());
        };

        let strategy = match self.config.smart_commits_pattern() {
            Some(pattern) => Strategy::SmartCommits(pattern.to_string()),
            None => match (self.config.jql(), self.config.project_id()) {
                (Some(jql), _) => Strategy::Query(jql.to_string()),
                (None, Some(project_id)) => Strategy::Query(default_jql(project_id)),
                // has_issue_selector ruled this combination out above
                (None, None) => {
                    return Err(
                        "A Jira project id is required when neither a jql query nor a smart \
                         commits pattern is given [--jira-project-id]"
                            .to_string(),
                    )
                }
            },
        };

        Ok(ResolvedSettings {
            server: server.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            strategy,
        })
    }
}

/// The stock closed-issue query for a project, used when no explicit jql
/// is configured.
fn default_jql(project_id: &str) -> String {
    format!(
        "project = {} AND (issuetype = Bug OR issuetype = Story OR issuetype = \"New Feature\") \
         AND status in (Closed, Resolved)",
        project_id
    )
}

impl<T: Transport, L: CommitLog> IssueTracker for JiraIssueTracker<T, L> {
    fn verify_configuration(&self) -> bool {
        match self.resolve_settings() {
            Ok(_) => true,
            Err(message) => {
                tracing::error!("{}", message);
                false
            }
        }
    }

    fn closed_issues(
        &self,
        since: Option<DateTime<Utc>>,
        since_commit: Option<&str>,
    ) -> relnotes_core::Result<Vec<OnlineIssue>> {
        let settings = self.resolve_settings().map_err(CoreError::Validation)?;
        let api = JiraApi::new(
            &self.transport,
            &settings.server,
            Credentials::new(settings.username, settings.password),
        );

        let issues = match &settings.strategy {
            Strategy::SmartCommits(pattern) => {
                let commits = self.commits.commits_chronological(since_commit)?;
                SmartCommitIssues::new(&api, pattern, &commits)?
                    .collect::<crate::Result<Vec<_>>>()?
            }
            Strategy::Query(jql) => {
                let jql = jql_with_since(jql, since);
                ClosedIssues::new(&api, jql).collect::<crate::Result<Vec<_>>>()?
            }
        };

        tracing::info!("Retrieved {} closed issues from Jira", issues.len());
        Ok(issues)
    }

    fn remote_present(&self) -> bool {
        false
    }

    fn diff_url_format(&self) -> String {
        String::new()
    }
}
