//! Normalized tracker issue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a tracker item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Issue,
    PullRequest,
}

/// One issue resolved from the tracker, normalized for release notes.
///
/// Two values with the same `id` refer to the same issue. `date_closed` is
/// `None` when no closure date is known; consumers must treat that as
/// "unknown", not as a failure. For issues found through smart commits the
/// date is the referencing commit's timestamp rather than anything the
/// tracker reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineIssue {
    pub id: String,
    pub title: String,
    pub html_url: String,
    pub issue_type: IssueType,
    pub date_closed: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_roundtrips_through_json() {
        let issue = OnlineIssue {
            id: "SRV-42".to_string(),
            title: "Fix the flux capacitor".to_string(),
            html_url: "https://jira.example.com/browse/SRV-42".to_string(),
            issue_type: IssueType::Issue,
            date_closed: None,
        };

        let json = serde_json::to_string(&issue).unwrap();
        let back: OnlineIssue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issue);
    }
}
