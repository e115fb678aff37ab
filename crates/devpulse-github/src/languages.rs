//! Byte-weighted language distribution across repositories

use crate::client::{Auth, GitHub};
use crate::colors::language_color;
use crate::error::GitHubError;
use crate::transport::Transport;
use crate::types::{LanguageShare, RepositoryLanguages};
use devpulse_store::ServiceConfig;
use std::collections::BTreeMap;

/// Repositories sampled for language bytes
const MAX_SAMPLED_REPOS: usize = 10;

/// Languages kept in the distribution
const MAX_LANGUAGES: usize = 8;

/// Percentages of total bytes, highest first, top eight
pub fn language_distribution(repos: &[RepositoryLanguages]) -> Vec<LanguageShare> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for repo in repos {
        for (language, &bytes) in &repo.languages {
            *totals.entry(language.as_str()).or_default() += bytes;
        }
    }

    let total_bytes: u64 = totals.values().sum();
    let mut shares: Vec<LanguageShare> = totals
        .into_iter()
        .map(|(language, bytes)| LanguageShare {
            language: language.to_string(),
            bytes,
            percentage: if total_bytes > 0 {
                bytes as f64 / total_bytes as f64 * 100.0
            } else {
                0.0
            },
            color: language_color(language).to_string(),
        })
        .collect();

    // BTreeMap order makes ties deterministic (alphabetical)
    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares.truncate(MAX_LANGUAGES);
    shares
}

impl<T: Transport> GitHub<T> {
    /// Language bytes for up to ten repositories: the selection, or the
    /// recently active ones when nothing is selected
    pub async fn fetch_repository_languages(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<RepositoryLanguages>, GitHubError> {
        let auth = Auth::require(&service.credentials)?;

        let repositories = if service.selected_repositories().is_empty() {
            self.active_repositories(&auth).await
        } else {
            service.selected_repositories().to_vec()
        };

        let mut sampled = Vec::new();
        for (i, repo) in repositories.iter().take(MAX_SAMPLED_REPOS).enumerate() {
            if i > 0 {
                self.throttle().pause().await;
            }
            let path = format!("/repos/{}/languages", repo);
            if let Some(languages) = self.try_get::<BTreeMap<String, u64>>(&auth, &path, &[]).await
            {
                sampled.push(RepositoryLanguages {
                    repository: repo.clone(),
                    languages,
                });
            }
        }
        Ok(sampled)
    }

    pub async fn fetch_language_distribution(
        &self,
        service: &ServiceConfig,
    ) -> Result<Vec<LanguageShare>, GitHubError> {
        let repos = self.fetch_repository_languages(service).await?;
        Ok(language_distribution(&repos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, langs: &[(&str, u64)]) -> RepositoryLanguages {
        RepositoryLanguages {
            repository: name.to_string(),
            languages: langs.iter().map(|(l, b)| (l.to_string(), *b)).collect(),
        }
    }

    #[test]
    fn test_distribution_weighted_by_bytes() {
        let shares = language_distribution(&[
            repo("a/x", &[("Rust", 600), ("Shell", 100)]),
            repo("a/y", &[("Rust", 200), ("TypeScript", 100)]),
        ]);

        assert_eq!(shares[0].language, "Rust");
        assert_eq!(shares[0].bytes, 800);
        assert!((shares[0].percentage - 80.0).abs() < 1e-9);
        assert_eq!(shares[0].color, "#dea584");
        // Shell and TypeScript tie; alphabetical order breaks it
        assert_eq!(shares[1].language, "Shell");
        assert_eq!(shares[2].language, "TypeScript");
    }

    #[test]
    fn test_distribution_capped_and_bounded() {
        let langs: Vec<(String, u64)> = (0..12).map(|i| (format!("Lang{}", i), 10 + i)).collect();
        let refs: Vec<(&str, u64)> = langs.iter().map(|(l, b)| (l.as_str(), *b)).collect();
        let shares = language_distribution(&[repo("a/x", &refs)]);

        assert_eq!(shares.len(), 8);
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!(sum <= 100.0 + 1e-9);
        assert!(shares
            .windows(2)
            .all(|w| w[0].percentage >= w[1].percentage));
        assert!(shares.iter().all(|s| s.color == crate::NEUTRAL_COLOR));
    }

    #[test]
    fn test_distribution_empty() {
        assert!(language_distribution(&[]).is_empty());
        let shares = language_distribution(&[repo("a/x", &[("Rust", 0)])]);
        assert_eq!(shares[0].percentage, 0.0);
    }
}
