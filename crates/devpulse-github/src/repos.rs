//! Repository and branch selection flows, profile lookup

use crate::client::{Auth, GitHub};
use crate::error::GitHubError;
use crate::models::{ApiRepository, ApiUser, Branch, Login};
use crate::transport::Transport;
use crate::types::{Profile, Repository};
use devpulse_store::ServiceConfig;
use std::collections::{BTreeMap, HashSet};

/// Organizations whose repositories are listed
const MAX_ORGS: usize = 10;

/// Preferred default: `main`, then `master`, then the first branch
pub fn default_branch_for(branches: &[String]) -> String {
    ["main", "master"]
        .iter()
        .find(|name| branches.iter().any(|b| b == *name))
        .map(|name| name.to_string())
        .or_else(|| branches.first().cloned())
        .unwrap_or_else(|| "main".to_string())
}

/// Pick a default branch for every fetched repository without a selection
pub fn fill_default_branches(
    selection: &mut BTreeMap<String, String>,
    fetched: &BTreeMap<String, Vec<String>>,
) {
    for (repo, branches) in fetched {
        selection
            .entry(repo.clone())
            .or_insert_with(|| default_branch_for(branches));
    }
}

impl From<ApiRepository> for Repository {
    fn from(repo: ApiRepository) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            private: repo.private,
            owner: repo.owner.login,
            stargazers_count: repo.stargazers_count,
            updated_at: repo.updated_at,
        }
    }
}

impl<T: Transport> GitHub<T> {
    /// Owned and organization repositories, unique by id, recently updated first.
    ///
    /// Fails only when credentials are missing or not a single listing could
    /// be fetched.
    pub async fn list_repositories(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<Repository>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let mut all: Vec<ApiRepository> = Vec::new();
        let mut any_ok = false;

        let path = format!("/users/{}/repos", auth.username);
        let params = [
            ("type", "owner".to_string()),
            ("sort", "updated".to_string()),
            ("per_page", "100".to_string()),
        ];
        if let Some(owned) = self.try_get::<Vec<ApiRepository>>(&auth, &path, &params).await {
            any_ok = true;
            all.extend(owned);
        }

        if let Some(orgs) = self.try_get::<Vec<Login>>(&auth, "/user/orgs", &[]).await {
            any_ok = true;
            for (i, org) in orgs.iter().take(MAX_ORGS).enumerate() {
                if i > 0 {
                    self.throttle().pause().await;
                }
                let path = format!("/orgs/{}/repos", org.login);
                let params = [
                    ("sort", "updated".to_string()),
                    ("per_page", "100".to_string()),
                ];
                if let Some(repos) = self.try_get::<Vec<ApiRepository>>(&auth, &path, &params).await
                {
                    all.extend(repos);
                }
            }
        }

        if !any_ok {
            return Err(GitHubError::Unavailable);
        }

        let mut seen = HashSet::new();
        let mut unique: Vec<Repository> = all
            .into_iter()
            .filter(|r| seen.insert(r.id))
            .map(Repository::from)
            .collect();
        unique.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(unique)
    }

    /// Branch names for each repository; failed repositories are omitted
    pub async fn list_branches(
        &self,
        service: &ServiceConfig,
        repositories: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let mut fetched = BTreeMap::new();

        for (i, repo) in repositories.iter().enumerate() {
            if i > 0 {
                self.throttle().pause().await;
            }
            let path = format!("/repos/{}/branches", repo);
            if let Some(branches) = self
                .try_get::<Vec<Branch>>(&auth, &path, &[("per_page", "50".to_string())])
                .await
            {
                fetched.insert(
                    repo.clone(),
                    branches.into_iter().map(|b| b.name).collect(),
                );
            }
        }
        Ok(fetched)
    }

    /// Profile of the configured user; unlike the feed fetchers this
    /// surfaces HTTP failures, since it exists to check credentials
    pub async fn fetch_profile(&self, service: &ServiceConfig) -> Result<Profile, GitHubError> {
        let auth = Auth::require(&service.credentials)?;
        let path = format!("/users/{}", auth.username);
        let user: ApiUser = self.get(&auth, &path, &[]).await?;
        Ok(Profile {
            login: user.login,
            name: user.name,
            public_repos: user.public_repos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_branch_preference() {
        assert_eq!(default_branch_for(&names(&["dev", "master", "main"])), "main");
        assert_eq!(default_branch_for(&names(&["dev", "master"])), "master");
        assert_eq!(default_branch_for(&names(&["trunk", "dev"])), "trunk");
        assert_eq!(default_branch_for(&[]), "main");
    }

    #[test]
    fn test_fill_keeps_existing_selection() {
        let mut selection = BTreeMap::new();
        selection.insert("a/x".to_string(), "release".to_string());

        let mut fetched = BTreeMap::new();
        fetched.insert("a/x".to_string(), names(&["main", "release"]));
        fetched.insert("a/y".to_string(), names(&["master"]));

        fill_default_branches(&mut selection, &fetched);
        assert_eq!(selection["a/x"], "release");
        assert_eq!(selection["a/y"], "master");
    }
}
