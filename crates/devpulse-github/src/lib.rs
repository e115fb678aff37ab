//! GitHub REST client functions for the activity dashboard
//!
//! Every fetcher is best-effort: a failing sub-request is logged and skipped
//! so the aggregate still returns whatever the other requests produced. The
//! only hard failure is missing credentials, which is reported before any
//! request goes out.

mod client;
mod colors;
mod commits;
mod error;
mod issues;
mod languages;
mod models;
mod pulls;
mod repos;
mod search;
mod transport;
mod types;

pub use client::{
    window_start, Auth, GitHub, Throttle, ACTIVITY_WINDOW_DAYS, DEFAULT_DELAY,
    PR_SEARCH_WINDOW_DAYS,
};
pub use colors::{language_color, NEUTRAL_COLOR};
pub use commits::{commits_by_repository, MAX_COMMITS};
pub use error::GitHubError;
pub use languages::language_distribution;
pub use repos::{default_branch_for, fill_default_branches};
pub use search::SearchQuery;
pub use transport::{HttpTransport, MockTransport, Transport};
pub use types::{
    Commit, LanguageShare, Profile, PrState, PullRequest, PushEvent, Repository,
    RepositoryLanguages, Review, SuggestedIssue,
};
