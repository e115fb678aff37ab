//! Open issues matching suggestion keywords

use crate::client::{Auth, GitHub};
use crate::error::GitHubError;
use crate::models::SearchResponse;
use crate::search::SearchQuery;
use crate::transport::Transport;
use crate::types::SuggestedIssue;
use devpulse_store::ServiceConfig;

/// Repositories searched for issues
const MAX_ISSUE_REPOS: usize = 3;

/// Stop collecting once this many issues are found
const MAX_ISSUES: usize = 6;

impl<T: Transport> GitHub<T> {
    /// Open issues in the first three selected repositories matching any term
    pub async fn fetch_suggested_issues(
        &self,
        service: &ServiceConfig,
        terms: &[String],
    ) -> Result<Vec<SuggestedIssue>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let mut issues = Vec::new();

        for (i, repo) in service
            .selected_repositories()
            .iter()
            .take(MAX_ISSUE_REPOS)
            .enumerate()
        {
            if issues.len() >= MAX_ISSUES {
                break;
            }
            if i > 0 {
                self.throttle().pause().await;
            }

            let query = SearchQuery::new()
                .qualifier("repo", repo)
                .qualifier("state", "open")
                .qualifier("type", "issue")
                .any_of(terms);
            let params = [
                ("q", query.as_string()),
                ("sort", "updated".to_string()),
                ("per_page", "5".to_string()),
            ];

            let Some(found) = self
                .try_get::<SearchResponse>(&auth, "/search/issues", &params)
                .await
            else {
                continue;
            };

            for item in found.items {
                if issues.len() >= MAX_ISSUES {
                    break;
                }
                issues.push(SuggestedIssue {
                    title: item.title,
                    url: item.html_url,
                    repository: repo.clone(),
                });
            }
        }
        Ok(issues)
    }
}
