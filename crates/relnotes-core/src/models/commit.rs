//! Commit metadata handed over by the git access layer

use chrono::{DateTime, Utc};

/// One commit as the correlation engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: String,
    pub message: String,
    pub committer_name: String,
    pub committer_email: String,
    pub committed_at: DateTime<Utc>,
}
