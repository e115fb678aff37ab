//! Recent commits and push events

use crate::client::{Auth, GitHub, ACTIVITY_WINDOW_DAYS};
use crate::error::GitHubError;
use crate::models::{Event, RepoCommit};
use crate::transport::Transport;
use crate::types::{Commit, PushEvent};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use devpulse_store::ServiceConfig;
use std::collections::{BTreeMap, HashSet};

/// Most commits returned by [`GitHub::fetch_recent_commits`]
pub const MAX_COMMITS: usize = 50;

fn selected(repositories: &[String], name: &str) -> bool {
    repositories.is_empty() || repositories.iter().any(|r| r == name)
}

fn windowed_pushes<'a>(
    events: &'a [Event],
    since: DateTime<Utc>,
    repositories: &'a [String],
) -> impl Iterator<Item = &'a Event> + 'a {
    events
        .iter()
        .filter(move |e| e.is_push() && e.created_at >= since)
        .filter(move |e| selected(repositories, e.repo_name()))
}

/// Merge two commit sources, keeping the first occurrence of each SHA,
/// then sort newest first and cap
pub(crate) fn merge_commits(primary: Vec<Commit>, secondary: Vec<Commit>) -> Vec<Commit> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Commit> = primary
        .into_iter()
        .chain(secondary)
        .filter(|c| seen.insert(c.sha.clone()))
        .collect();

    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged.truncate(MAX_COMMITS);
    merged
}

fn is_own_commit(commit: &RepoCommit, username: &str) -> bool {
    commit.author.as_ref().is_some_and(|a| a.login == username)
        || commit
            .commit
            .author
            .as_ref()
            .and_then(|a| a.email.as_deref())
            .is_some_and(|email| email.contains(username))
}

impl<T: Transport> GitHub<T> {
    /// Commits by the user in the last seven days, from the event feed and,
    /// for selected repositories, the per-repository commit listings
    pub async fn fetch_recent_commits(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<Commit>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let repositories = service.selected_repositories();
        let since = self.window_start(ACTIVITY_WINDOW_DAYS);

        let mut from_events = Vec::new();
        if let Some(events) = self.user_events(&auth).await {
            for event in windowed_pushes(&events, since, repositories) {
                let repo = event.repo_name();
                for commit in event.push_commits() {
                    from_events.push(Commit {
                        sha: commit.sha.clone(),
                        message: commit.message.clone(),
                        author: commit
                            .author
                            .as_ref()
                            .and_then(|a| a.name.clone())
                            .unwrap_or_else(|| auth.username.to_string()),
                        date: event.created_at,
                        repository: repo.to_string(),
                        url: format!("https://github.com/{}/commit/{}", repo, commit.sha),
                    });
                }
            }
        }

        let mut direct = Vec::new();
        for (i, repo) in repositories.iter().enumerate() {
            if i > 0 {
                self.throttle().pause().await;
            }
            direct.extend(
                self.fetch_repository_commits(&auth, repo, service.branch_for(repo), since)
                    .await,
            );
        }

        Ok(merge_commits(from_events, direct))
    }

    async fn fetch_repository_commits(
        &self,
        auth: &Auth<'_>,
        repo: &str,
        branch: Option<&str>,
        since: DateTime<Utc>,
    ) -> Vec<Commit> {
        let mut params = vec![
            ("since", since.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("per_page", "100".to_string()),
        ];
        if let Some(branch) = branch {
            params.push(("sha", branch.to_string()));
        }

        let path = format!("/repos/{}/commits", repo);
        let Some(listing) = self.try_get::<Vec<RepoCommit>>(auth, &path, &params).await else {
            return Vec::new();
        };

        listing
            .into_iter()
            .filter(|c| is_own_commit(c, auth.username))
            .filter_map(|c| {
                let author = c.commit.author.as_ref();
                let date = author.and_then(|a| a.date)?;
                Some(Commit {
                    author: author
                        .and_then(|a| a.name.clone())
                        .unwrap_or_else(|| auth.username.to_string()),
                    sha: c.sha,
                    message: c.commit.message,
                    date,
                    repository: repo.to_string(),
                    url: c.html_url,
                })
            })
            .collect()
    }

    /// Push events of the last seven days (rolling, from now) across every
    /// repository; the selection does not apply
    pub async fn fetch_push_events(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<PushEvent>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let since = self.now() - Duration::days(ACTIVITY_WINDOW_DAYS);

        let Some(events) = self.user_events(&auth).await else {
            return Ok(Vec::new());
        };

        Ok(windowed_pushes(&events, since, &[])
            .map(|e| PushEvent {
                created_at: e.created_at,
                repository: e.repo_name().to_string(),
                commit_count: e.push_commits().len(),
            })
            .collect())
    }

    /// Distinct repositories from the event feed, most recent first
    pub async fn recently_active_repositories(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<String>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        Ok(self.active_repositories(&auth).await)
    }

    pub(crate) async fn active_repositories(&self, auth: &Auth<'_>) -> Vec<String> {
        const MAX_ACTIVE: usize = 20;

        let Some(events) = self.user_events(auth).await else {
            return Vec::new();
        };

        let mut names: Vec<String> = Vec::new();
        for event in &events {
            if let Some(repo) = &event.repo {
                if !names.contains(&repo.name) {
                    names.push(repo.name.clone());
                }
            }
        }
        names.truncate(MAX_ACTIVE);
        names
    }
}

/// Commits per repository, for callers grouping the merged list
pub fn commits_by_repository(commits: &[Commit]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for commit in commits {
        *counts.entry(commit.repository.as_str()).or_default() += 1;
    }
    counts
}
