//! Pull request list and counts

use crate::client::{Auth, GitHub, ACTIVITY_WINDOW_DAYS, PR_SEARCH_WINDOW_DAYS};
use crate::error::GitHubError;
use crate::models::{RepoPull, SearchItem, SearchResponse};
use crate::search::SearchQuery;
use crate::transport::Transport;
use crate::types::{PrState, PullRequest};
use devpulse_store::ServiceConfig;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Repositories probed directly when the search finds nothing
const FALLBACK_REPOS: usize = 5;

/// Open first, then most recently created
pub(crate) fn sort_pull_requests(pulls: &mut [PullRequest]) {
    pulls.sort_by(|a, b| {
        let a_open = a.state == PrState::Open;
        let b_open = b.state == PrState::Open;
        match (a_open, b_open) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => b.created_at.cmp(&a.created_at),
        }
    });
}

/// Drop repeats of the same (repository, number)
pub(crate) fn dedup_pull_requests(pulls: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    pulls
        .into_iter()
        .filter(|p| seen.insert((p.repository.clone(), p.number)))
        .collect()
}

/// `owner/name` from an API repository URL, else from the web URL
fn repository_of(item: &SearchItem) -> String {
    if let Some(api) = &item.repository_url {
        if let Some(idx) = api.find("/repos/") {
            return api[idx + "/repos/".len()..].to_string();
        }
    }

    let segments: Vec<&str> = item.html_url.split('/').collect();
    if segments.len() >= 5 {
        format!("{}/{}", segments[3], segments[4])
    } else {
        "unknown".to_string()
    }
}

fn from_search_item(item: SearchItem, username: &str) -> PullRequest {
    let merged = item
        .pull_request
        .as_ref()
        .is_some_and(|p| p.merged_at.is_some());
    PullRequest {
        repository: repository_of(&item),
        number: item.number,
        title: item.title,
        state: PrState::from_api(&item.state, merged),
        author: item
            .user
            .map(|u| u.login)
            .unwrap_or_else(|| username.to_string()),
        url: item.html_url,
        created_at: item.created_at,
        updated_at: item.updated_at,
        approvals: 0,
        requested_changes: 0,
        comments: item.comments,
        reviews: Vec::new(),
    }
}

fn from_repo_pull(pull: RepoPull, repository: &str, username: &str) -> PullRequest {
    PullRequest {
        number: pull.number,
        title: pull.title,
        state: PrState::from_api(&pull.state, pull.merged_at.is_some()),
        author: pull
            .user
            .map(|u| u.login)
            .unwrap_or_else(|| username.to_string()),
        repository: repository.to_string(),
        url: pull.html_url,
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        approvals: 0,
        requested_changes: 0,
        comments: pull.comments.unwrap_or(0),
        reviews: Vec::new(),
    }
}

impl<T: Transport> GitHub<T> {
    /// PRs involving the user updated in the last 30 days
    pub async fn fetch_pull_requests(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let repositories = service.selected_repositories();

        let query = SearchQuery::new()
            .qualifier("involves", auth.username)
            .qualifier("type", "pr")
            .since("updated", self.search_date(PR_SEARCH_WINDOW_DAYS))
            .repos(repositories);
        let params = [
            ("q", query.as_string()),
            ("sort", "updated".to_string()),
            ("order", "desc".to_string()),
            ("per_page", "50".to_string()),
        ];

        let mut pulls: Vec<PullRequest> = self
            .try_get::<SearchResponse>(&auth, "/search/issues", &params)
            .await
            .map(|r| r.items)
            .unwrap_or_default()
            .into_iter()
            .map(|item| from_search_item(item, auth.username))
            .collect();

        if pulls.is_empty() && !repositories.is_empty() {
            for (i, repo) in repositories.iter().take(FALLBACK_REPOS).enumerate() {
                if i > 0 {
                    self.throttle().pause().await;
                }
                let path = format!("/repos/{}/pulls", repo);
                let params = [
                    ("state", "open".to_string()),
                    ("per_page", "10".to_string()),
                ];
                let Some(listing) = self.try_get::<Vec<RepoPull>>(&auth, &path, &params).await
                else {
                    continue;
                };
                pulls.extend(
                    listing
                        .into_iter()
                        .filter(|p| p.involves(auth.username))
                        .map(|p| from_repo_pull(p, repo, auth.username)),
                );
            }
        }

        let mut pulls = dedup_pull_requests(pulls);
        sort_pull_requests(&mut pulls);
        Ok(pulls)
    }

    /// Number of PRs the user opened in the last seven days (0 on failure)
    pub async fn fetch_pr_count(&self, service: &ServiceConfig) -> Result<u64, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let query = SearchQuery::new()
            .qualifier("author", auth.username)
            .qualifier("type", "pr")
            .since("created", self.search_date(ACTIVITY_WINDOW_DAYS))
            .repos(service.selected_repositories());

        Ok(self
            .try_get::<SearchResponse>(&auth, "/search/issues", &[("q", query.as_string())])
            .await
            .map(|r| r.total_count)
            .unwrap_or(0))
    }
}
