//! Relnotes core
//!
//! Domain model, git access and the tracker interface shared by the
//! per-vendor integrations.

pub mod error;
pub mod git;
pub mod models;
pub mod tracker;

pub use error::{Error, Result};
pub use models::{CommitInfo, IssueType, OnlineIssue, TrackerConfig};
pub use tracker::IssueTracker;
