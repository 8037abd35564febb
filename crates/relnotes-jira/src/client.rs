//! Low level Jira REST client
//!
//! One authenticated request per call, typed responses, fail fast on
//! anything the server rejects. No retries and no backoff; a failed run
//! is restarted by the operator.

use crate::auth::Credentials;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::types::{JiraIssue, ProjectEntry, SearchRequest, SearchResponse};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use relnotes_core::models::{IssueType, OnlineIssue};

pub const PAGE_SIZE: u32 = 100;

const SEARCH_FIELDS: [&str; 3] = ["summary", "issuetype", "resolutiondate"];

pub struct JiraApi<T> {
    transport: T,
    base_url: String,
    credentials: Credentials,
}

impl<T: Transport> JiraApi<T> {
    pub fn new(transport: T, server: &str, credentials: Credentials) -> Self {
        Self {
            transport,
            base_url: server.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Absolute browse link for an issue key.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    /// One page of search results starting at `start_at`.
    ///
    /// A 400 means the server rejected the jql itself.
    pub fn search_page(&self, jql: &str, start_at: u64) -> Result<SearchResponse> {
        let body = serde_json::to_string(&SearchRequest {
            jql,
            start_at,
            max_results: PAGE_SIZE,
            fields: &SEARCH_FIELDS,
        })?;

        let response = self.request(Method::Post, "rest/api/latest/search", Some(body))?;
        if response.status == 400 {
            return Err(Error::MalformedQuery);
        }
        if !response.is_success() {
            return Err(Error::Api(response.status_text));
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    /// Short keys of every project on this server.
    pub fn project_keys(&self) -> Result<Vec<String>> {
        let response = self.request(Method::Get, "rest/api/latest/project", None)?;
        if !response.is_success() {
            return Err(Error::Api(response.status_text));
        }

        let projects: Vec<ProjectEntry> = serde_json::from_str(&response.body)?;
        Ok(projects.into_iter().map(|p| p.key).collect())
    }

    /// Single issue lookup, summary only.
    ///
    /// `None` when the issue does not exist or is not visible to the
    /// authenticated user.
    pub fn issue(&self, key: &str) -> Result<Option<JiraIssue>> {
        let path = format!("rest/api/latest/issue/{}?fields=summary", key);
        let response = self.request(Method::Get, &path, None)?;
        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::Api(response.status_text));
        }

        Ok(Some(serde_json::from_str(&response.body)?))
    }

    /// Normalizes a search result; search results always count as plain
    /// issues regardless of the tracker-side issue type.
    pub fn to_online_issue(&self, issue: &JiraIssue) -> OnlineIssue {
        OnlineIssue {
            id: issue.key.clone(),
            title: issue.fields.summary.clone(),
            issue_type: IssueType::Issue,
            html_url: self.browse_url(&issue.key),
            date_closed: issue
                .fields
                .resolution_date
                .as_deref()
                .and_then(parse_resolution_date),
        }
    }

    fn request(&self, method: Method, path: &str, body: Option<String>) -> Result<ApiResponse> {
        let request = ApiRequest {
            method,
            url: format!("{}/{}", self.base_url, path),
            body,
            authorization: self.credentials.to_basic_auth(),
        };
        tracing::debug!("Jira request: {}", request.url);
        self.transport.execute(&request)
    }
}

/// Jira reports RFC 3339 timestamps on cloud and `+0000` style offsets on
/// older servers; anything else degrades to the "no date known" sentinel.
fn parse_resolution_date(raw: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z"));
    match parsed {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(_) => {
            tracing::warn!("Unparseable resolution date: {}", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::FakeTransport;
    use chrono::TimeZone;

    fn api(transport: &FakeTransport) -> JiraApi<&FakeTransport> {
        JiraApi::new(
            transport,
            "https://jira.example.com/",
            Credentials::new("fred".to_string(), "secret".to_string()),
        )
    }

    #[test]
    fn test_browse_url_joins_cleanly() {
        let transport = FakeTransport::new(vec![]);
        let api = api(&transport);
        assert_eq!(
            api.browse_url("SRV-12"),
            "https://jira.example.com/browse/SRV-12"
        );
    }

    #[test]
    fn test_every_request_carries_basic_auth() {
        let transport = FakeTransport::new(vec![FakeTransport::ok(r#"[{"key": "SRV"}]"#)]);
        api(&transport).project_keys().unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization, "Basic ZnJlZDpzZWNyZXQ=");
        assert_eq!(requests[0].url, "https://jira.example.com/rest/api/latest/project");
    }

    #[test]
    fn test_search_400_means_malformed_query() {
        let transport = FakeTransport::new(vec![FakeTransport::status(400, "Bad Request")]);
        let result = api(&transport).search_page("project = ", 0);
        assert!(matches!(result, Err(Error::MalformedQuery)));
    }

    #[test]
    fn test_search_failure_carries_status_description() {
        let transport =
            FakeTransport::new(vec![FakeTransport::status(503, "Service Unavailable")]);
        match api(&transport).search_page("project = SRV", 0) {
            Err(Error::Api(description)) => assert_eq!(description, "Service Unavailable"),
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_issue_404_is_absence_not_error() {
        let transport = FakeTransport::new(vec![FakeTransport::status(404, "Not Found")]);
        let result = api(&transport).issue("SRV-999").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_issue_lookup_projects_summary() {
        let transport = FakeTransport::new(vec![FakeTransport::ok(
            r#"{"key": "SRV-7", "fields": {"summary": "Found"}}"#,
        )]);
        let issue = api(&transport).issue("SRV-7").unwrap().unwrap();
        assert_eq!(issue.fields.summary, "Found");

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://jira.example.com/rest/api/latest/issue/SRV-7?fields=summary"
        );
        assert_eq!(requests[0].method, Method::Get);
        assert!(requests[0].body.is_none());
    }

    #[test]
    fn test_resolution_date_roundtrip() {
        let transport = FakeTransport::new(vec![]);
        let issue: JiraIssue = serde_json::from_str(
            r#"{"key": "SRV-1", "fields": {"summary": "Done", "resolutiondate": "2024-01-05T10:00:00Z"}}"#,
        )
        .unwrap();

        let online = api(&transport).to_online_issue(&issue);
        assert_eq!(
            online.date_closed,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap())
        );
        assert_eq!(online.id, "SRV-1");
        assert_eq!(online.issue_type, IssueType::Issue);
    }

    #[test]
    fn test_server_style_offsets_normalize_to_utc() {
        assert_eq!(
            parse_resolution_date("2024-01-05T10:00:00.000+0100"),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_garbage_dates_become_the_unset_sentinel() {
        assert_eq!(parse_resolution_date("last tuesday"), None);
    }

    #[test]
    fn test_missing_resolution_date_stays_unset() {
        let transport = FakeTransport::new(vec![]);
        let issue: JiraIssue = serde_json::from_str(
            r#"{"key": "SRV-2", "fields": {"summary": "Open ended"}}"#,
        )
        .unwrap();
        assert!(api(&transport).to_online_issue(&issue).date_closed.is_none());
    }
}
