//! Jira REST API wire types

use serde::{Deserialize, Serialize};

/// Body of `POST rest/api/latest/search`.
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub jql: &'a str,
    #[serde(rename = "startAt")]
    pub start_at: u64,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    pub fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub issues: Vec<JiraIssue>,
    /// Matching issues across all pages, not just this one.
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub fields: JiraFields,
}

/// Only the projected fields; single-issue lookups project `summary`
/// alone, so everything else must be optional.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraFields {
    pub summary: String,
    #[serde(rename = "issuetype", default)]
    pub issue_type: Option<IssueTypeField>,
    #[serde(rename = "resolutiondate", default)]
    pub resolution_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueTypeField {
    pub name: String,
}

/// One entry of `GET rest/api/latest/project`; the listing carries much
/// more, only the key matters here.
#[derive(Debug, Deserialize)]
pub struct ProjectEntry {
    pub key: String,
}
