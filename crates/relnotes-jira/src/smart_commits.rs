//! Smart-commit correlation engine
//!
//! When no query is configured, closed issues are inferred from issue
//! references in commit messages. Tokens are validated against the
//! server's real project keys before any lookup, and each distinct token
//! is resolved remotely at most once per run.

use crate::client::JiraApi;
use crate::transport::Transport;
use crate::Result;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use relnotes_core::models::{CommitInfo, IssueType, OnlineIssue};
use std::collections::HashMap;

/// One matched token waiting to be resolved against the tracker.
#[derive(Debug, Clone)]
struct Candidate {
    token: String,
    committed_at: DateTime<Utc>,
    committer: String,
}

/// Issue data kept per token once the tracker answered; `None` marks a
/// token the tracker does not know (or will not show us).
#[derive(Debug, Clone)]
struct ResolvedIssue {
    title: String,
    html_url: String,
}

/// Lazily resolves candidates in commit order. Every reference produces
/// its own entry; only the remote lookups are deduplicated.
pub struct SmartCommitIssues<'a, T> {
    api: &'a JiraApi<T>,
    candidates: std::vec::IntoIter<Candidate>,
    cache: HashMap<String, Option<ResolvedIssue>>,
    finished: bool,
}

impl<'a, T: Transport> SmartCommitIssues<'a, T> {
    /// Scans `commits` (oldest first) with the configured pattern and
    /// prepares the candidate list. Fetches the project-key directory up
    /// front; without it issue references cannot be told apart from
    /// coincidental text, so a failure here is fatal.
    pub fn new(api: &'a JiraApi<T>, pattern: &str, commits: &[CommitInfo]) -> Result<Self> {
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()?;

        let keys = api.project_keys()?;
        let key_filter = Regex::new(&format!("({})-[0-9]+", keys.join("|")))?;

        let mut candidates = Vec::new();
        for commit in commits {
            for found in matcher.find_iter(&commit.message) {
                if !key_filter.is_match(found.as_str()) {
                    continue;
                }
                candidates.push(Candidate {
                    token: found.as_str().to_string(),
                    committed_at: commit.committed_at,
                    committer: commit.committer_name.clone(),
                });
            }
        }
        tracing::debug!("Found {} smart commit references", candidates.len());

        Ok(Self {
            api,
            candidates: candidates.into_iter(),
            cache: HashMap::new(),
            finished: false,
        })
    }

    fn resolve(&mut self, candidate: &Candidate) -> Result<Option<ResolvedIssue>> {
        if let Some(cached) = self.cache.get(&candidate.token) {
            return Ok(cached.clone());
        }

        tracing::debug!(
            "Resolving {} (first referenced by {})",
            candidate.token,
            candidate.committer
        );
        let resolved = self.api.issue(&candidate.token)?.map(|issue| ResolvedIssue {
            title: issue.fields.summary.clone(),
            html_url: self.api.browse_url(&issue.key),
        });
        self.cache.insert(candidate.token.clone(), resolved.clone());
        Ok(resolved)
    }
}

impl<'a, T: Transport> Iterator for SmartCommitIssues<'a, T> {
    type Item = Result<OnlineIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let candidate = self.candidates.next()?;
            match self.resolve(&candidate) {
                Ok(Some(issue)) => {
                    // closure time is when the referencing commit landed,
                    // not whatever the tracker thinks
                    return Some(Ok(OnlineIssue {
                        id: candidate.token.clone(),
                        title: issue.title,
                        html_url: issue.html_url,
                        issue_type: IssueType::Issue,
                        date_closed: Some(candidate.committed_at),
                    }));
                }
                Ok(None) => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
