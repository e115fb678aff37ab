//! Raw GitHub REST payloads (only the fields the dashboard reads)

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Login {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventRepo {
    pub name: String,
}

/// Entry of `/users/{user}/events`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub repo: Option<EventRepo>,
    #[serde(default)]
    pub payload: Option<EventPayload>,
}

impl Event {
    pub fn is_push(&self) -> bool {
        self.kind == "PushEvent"
    }

    pub fn repo_name(&self) -> &str {
        self.repo.as_ref().map(|r| r.name.as_str()).unwrap_or("unknown")
    }

    pub fn push_commits(&self) -> &[PushCommit] {
        self.payload
            .as_ref()
            .map(|p| p.commits.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventPayload {
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PushCommit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<GitIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GitIdentity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Entry of `/repos/{repo}/commits`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepoCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub author: Option<Login>,
    pub commit: RepoCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepoCommitDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<GitIdentity>,
}

/// Body of `/search/issues`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchItem {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub user: Option<Login>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PullRequestLink {
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Entry of `/repos/{repo}/pulls`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepoPull {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub user: Option<Login>,
    #[serde(default)]
    pub assignee: Option<Login>,
    #[serde(default)]
    pub assignees: Vec<Login>,
}

impl RepoPull {
    pub fn involves(&self, username: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.login == username)
            || self.assignee.as_ref().is_some_and(|u| u.login == username)
            || self.assignees.iter().any(|a| a.login == username)
    }
}

/// Entry of `/users/{user}/repos` and `/orgs/{org}/repos`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub owner: Login,
    #[serde(default)]
    pub stargazers_count: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Branch {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_without_payload() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "type": "WatchEvent",
            "created_at": "2026-10-18T10:00:00Z",
            "repo": {"name": "a/x"}
        }))
        .unwrap();
        assert!(!event.is_push());
        assert!(event.push_commits().is_empty());
        assert_eq!(event.repo_name(), "a/x");
    }

    #[test]
    fn test_pull_involvement() {
        let pull: RepoPull = serde_json::from_value(serde_json::json!({
            "number": 3,
            "title": "Fix",
            "state": "open",
            "html_url": "https://github.com/a/x/pull/3",
            "created_at": "2026-10-18T10:00:00Z",
            "updated_at": "2026-10-18T10:00:00Z",
            "user": {"login": "someone"},
            "assignees": [{"login": "octocat"}]
        }))
        .unwrap();
        assert!(pull.involves("octocat"));
        assert!(!pull.involves("ghost"));
    }
}
