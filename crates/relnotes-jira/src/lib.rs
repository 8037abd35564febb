//! Jira issue tracker integration
//!
//! Closed-issue queries, smart-commit correlation and the tracker facade
//! backing release notes composition.

pub mod auth;
pub mod client;
pub mod error;
pub mod query;
pub mod smart_commits;
pub mod tracker;
pub mod transport;
pub mod types;

pub use client::JiraApi;
pub use error::{Error, Result};
pub use tracker::JiraIssueTracker;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
