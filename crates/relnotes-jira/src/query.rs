//! Closed-issue query strategy
//!
//! Builds the jql expression and pages through the search endpoint.

use crate::client::JiraApi;
use crate::transport::Transport;
use crate::types::JiraIssue;
use crate::Result;
use chrono::{DateTime, Utc};
use relnotes_core::models::OnlineIssue;
use std::collections::VecDeque;

/// Appends the update cutoff to the configured jql.
///
/// Jira only honors minute precision here, and writes the day of month
/// without a leading zero.
pub fn jql_with_since(jql: &str, since: Option<DateTime<Utc>>) -> String {
    match since {
        Some(cutoff) => format!(
            "{} AND updated > '{}'",
            jql,
            cutoff.format("%Y-%m-%-d %H:%M")
        ),
        None => jql.to_string(),
    }
}

/// Lazily pages through `rest/api/latest/search`, yielding one issue at a
/// time in page order.
///
/// One pass only: the offset advances by each page's returned count until
/// it reaches the reported total. Recreating the iterator re-issues every
/// request from the first page.
pub struct ClosedIssues<'a, T> {
    api: &'a JiraApi<T>,
    jql: String,
    start_at: u64,
    total: Option<u64>,
    page: VecDeque<JiraIssue>,
    finished: bool,
}

impl<'a, T: Transport> ClosedIssues<'a, T> {
    pub fn new(api: &'a JiraApi<T>, jql: String) -> Self {
        Self {
            api,
            jql,
            start_at: 0,
            total: None,
            page: VecDeque::new(),
            finished: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let response = self.api.search_page(&self.jql, self.start_at)?;
        self.start_at += response.issues.len() as u64;
        self.total = Some(response.total);
        self.page = response.issues.into();
        Ok(())
    }
}

impl<'a, T: Transport> Iterator for ClosedIssues<'a, T> {
    type Item = Result<OnlineIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.page.is_empty() {
            let more_expected = match self.total {
                None => true,
                Some(total) => self.start_at < total,
            };
            if !more_expected {
                self.finished = true;
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.finished = true;
                return Some(Err(err));
            }
            if self.page.is_empty() {
                // the server promised more results but sent an empty page;
                // stop rather than re-request the same offset forever
                self.finished = true;
                return None;
            }
        }

        self.page
            .pop_front()
            .map(|issue| Ok(self.api.to_online_issue(&issue)))
    }
}
