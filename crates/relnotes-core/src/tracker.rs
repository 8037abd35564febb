//! Polymorphic tracker interface consumed by the release notes composer

use crate::models::OnlineIssue;
use crate::Result;
use chrono::{DateTime, Utc};

/// One implementation per tracker vendor.
///
/// Callers check `verify_configuration` first; `closed_issues` validates
/// again on its own so a skipped check can never reach the network with a
/// broken configuration.
pub trait IssueTracker {
    /// Checks the resolved configuration without touching the network.
    ///
    /// Logs a human readable diagnostic for the first missing or invalid
    /// field and returns false.
    fn verify_configuration(&self) -> bool;

    /// All closed issues, ordered, fully materialized.
    ///
    /// `since` narrows tracker-side queries to issues updated after that
    /// instant; `since_commit` scopes commit-scanning strategies to
    /// commits not reachable from that reference.
    fn closed_issues(
        &self,
        since: Option<DateTime<Utc>>,
        since_commit: Option<&str>,
    ) -> Result<Vec<OnlineIssue>>;

    /// Whether a repository remote matching this tracker was detected.
    fn remote_present(&self) -> bool;

    /// URL template for linking the diff between two releases, empty when
    /// the tracker has no such page.
    fn diff_url_format(&self) -> String;
}
