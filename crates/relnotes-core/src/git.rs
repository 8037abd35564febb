//! Git access layer
//!
//! Hands commit history to the tracker strategies; nothing here knows
//! about issue trackers.

use crate::models::CommitInfo;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use git2::{Repository, Sort};
use std::path::PathBuf;

/// Source of commit history for the correlation strategies.
///
/// A trait so tests can feed canned commits without a repository on disk.
pub trait CommitLog {
    /// All commits oldest first, optionally excluding everything reachable
    /// from `since_ref` (a branch, tag or commit id).
    fn commits_chronological(&self, since_ref: Option<&str>) -> Result<Vec<CommitInfo>>;
}

pub struct GitRepository {
    repo_path: PathBuf,
}

impl GitRepository {
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    fn get_repo(&self) -> Result<Repository> {
        Repository::open(&self.repo_path)
            .map_err(|e| Error::Git(format!("Failed to open git repo: {}", e)))
    }
}

impl CommitLog for GitRepository {
    fn commits_chronological(&self, since_ref: Option<&str>) -> Result<Vec<CommitInfo>> {
        let repo = self.get_repo()?;

        let mut walk = repo
            .revwalk()
            .map_err(|e| Error::Git(format!("Failed to walk history: {}", e)))?;
        walk.set_sorting(Sort::TIME | Sort::REVERSE)
            .map_err(|e| Error::Git(format!("Failed to sort history: {}", e)))?;
        walk.push_head()
            .map_err(|e| Error::Git(format!("Failed to resolve HEAD: {}", e)))?;

        if let Some(reference) = since_ref {
            let obj = repo
                .revparse_single(reference)
                .map_err(|e| Error::Git(format!("Failed to resolve '{}': {}", reference, e)))?;
            walk.hide(obj.id())
                .map_err(|e| Error::Git(format!("Failed to exclude '{}': {}", reference, e)))?;
        }

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid.map_err(|e| Error::Git(format!("Failed to walk history: {}", e)))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| Error::Git(format!("Failed to load commit {}: {}", oid, e)))?;

            let committer = commit.committer();
            commits.push(CommitInfo {
                id: commit.id().to_string(),
                message: commit.message().unwrap_or("").to_string(),
                committer_name: committer.name().unwrap_or("").to_string(),
                committer_email: committer.email().unwrap_or("").to_string(),
                committed_at: to_utc(committer.when()),
            });
        }

        Ok(commits)
    }
}

fn to_utc(when: git2::Time) -> DateTime<Utc> {
    DateTime::from_timestamp(when.seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Signature, Time};
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str, secs: i64, parent: Option<Oid>) -> Oid {
        let sig = Signature::new("Alice", "alice@example.com", &Time::new(secs, 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        match parent {
            Some(parent_id) => {
                let parent = repo.find_commit(parent_id).unwrap();
                repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
                    .unwrap()
            }
            None => repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
                .unwrap(),
        }
    }

    fn repo_with_history() -> (TempDir, Vec<Oid>) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit(&repo, "Initial import", 1_000, None);
        let second = commit(&repo, "Fix login [SRV-1]", 2_000, Some(first));
        let third = commit(&repo, "Polish styling", 3_000, Some(second));
        (dir, vec![first, second, third])
    }

    #[test]
    fn test_commits_come_back_oldest_first() {
        let (dir, ids) = repo_with_history();
        let git = GitRepository::new(dir.path().to_path_buf());

        let commits = git.commits_chronological(None).unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].id, ids[0].to_string());
        assert_eq!(commits[0].message, "Initial import");
        assert_eq!(commits[2].id, ids[2].to_string());
        assert!(commits[0].committed_at < commits[1].committed_at);
        assert_eq!(commits[1].committer_name, "Alice");
        assert_eq!(commits[1].committer_email, "alice@example.com");
    }

    #[test]
    fn test_since_ref_hides_reachable_commits() {
        let (dir, ids) = repo_with_history();
        let git = GitRepository::new(dir.path().to_path_buf());

        let commits = git
            .commits_chronological(Some(&ids[0].to_string()))
            .unwrap();
        let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["Fix login [SRV-1]", "Polish styling"]);
    }

    #[test]
    fn test_unknown_since_ref_is_an_error() {
        let (dir, _) = repo_with_history();
        let git = GitRepository::new(dir.path().to_path_buf());

        let result = git.commits_chronological(Some("no-such-ref"));
        assert!(matches!(result, Err(Error::Git(_))));
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let git = GitRepository::new(dir.path().join("nowhere"));
        assert!(git.commits_chronological(None).is_err());
    }
}
