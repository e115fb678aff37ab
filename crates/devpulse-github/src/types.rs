//! Normalized view models returned by the client functions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A commit authored by the configured user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub repository: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl PrState {
    pub fn from_api(state: &str, merged: bool) -> Self {
        match state {
            "open" => PrState::Open,
            _ if merged => PrState::Merged,
            _ => PrState::Closed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrState::Open => "open",
            PrState::Closed => "closed",
            PrState::Merged => "merged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub state: String,
    pub user: String,
}

/// A pull request involving the configured user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: PrState,
    pub author: String,
    pub repository: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Review counters are never populated
    pub approvals: u32,
    pub requested_changes: u32,
    pub comments: u64,
    pub reviews: Vec<Review>,
}

/// A push event inside the observation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    pub created_at: DateTime<Utc>,
    pub repository: String,
    pub commit_count: usize,
}

/// One slice of the language distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub percentage: f64,
    pub bytes: u64,
    pub color: String,
}

/// Byte counts per language for one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryLanguages {
    pub repository: String,
    pub languages: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedIssue {
    pub title: String,
    pub url: String,
    pub repository: String,
}

/// Repository entry for the selection flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub owner: String,
    pub stargazers_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Case-insensitive match on full name or description
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.full_name.to_lowercase().contains(&term)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub public_repos: u64,
}
