//! Tracker configuration

use serde::{Deserialize, Serialize};

/// Resolved settings for one issue tracker instance.
///
/// Plain data so it can come from CLI flags or a config file; the tracker
/// implementation validates it before any network access and reports the
/// first missing or invalid field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base url of the tracker server, e.g. `https://jira.example.com`.
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Project used to synthesize the default closed-issue query.
    pub project_id: Option<String>,
    /// Explicit query expression; overrides the synthesized one.
    pub jql: Option<String>,
    /// Regex applied to commit messages to pick up issue references.
    pub smart_commits_pattern: Option<String>,
}

impl TrackerConfig {
    /// True when at least one way of selecting issues is configured.
    pub fn has_issue_selector(&self) -> bool {
        is_set(&self.project_id) || is_set(&self.jql) || is_set(&self.smart_commits_pattern)
    }

    pub fn username(&self) -> Option<&str> {
        set_value(&self.username)
    }

    pub fn password(&self) -> Option<&str> {
        set_value(&self.password)
    }

    pub fn project_id(&self) -> Option<&str> {
        set_value(&self.project_id)
    }

    pub fn jql(&self) -> Option<&str> {
        set_value(&self.jql)
    }

    pub fn smart_commits_pattern(&self) -> Option<&str> {
        set_value(&self.smart_commits_pattern)
    }
}

fn is_set(value: &Option<String>) -> bool {
    set_value(value).is_some()
}

/// Treats missing and blank values the same way.
fn set_value(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_selector() {
        let config = TrackerConfig::default();
        assert!(!config.has_issue_selector());
        assert!(config.username().is_none());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = TrackerConfig {
            project_id: Some("   ".to_string()),
            jql: Some(String::new()),
            ..TrackerConfig::default()
        };
        assert!(!config.has_issue_selector());
    }

    #[test]
    fn test_any_selector_is_enough() {
        let by_project = TrackerConfig {
            project_id: Some("SRV".to_string()),
            ..TrackerConfig::default()
        };
        let by_jql = TrackerConfig {
            jql: Some("project = SRV".to_string()),
            ..TrackerConfig::default()
        };
        let by_pattern = TrackerConfig {
            smart_commits_pattern: Some(r"[A-Z]+-[0-9]+".to_string()),
            ..TrackerConfig::default()
        };
        assert!(by_project.has_issue_selector());
        assert!(by_jql.has_issue_selector());
        assert!(by_pattern.has_issue_selector());
    }

    #[test]
    fn test_accessors_trim_whitespace() {
        let config = TrackerConfig {
            username: Some("  fred ".to_string()),
            ..TrackerConfig::default()
        };
        assert_eq!(config.username(), Some("fred"));
    }
}
