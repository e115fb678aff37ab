//! HTTP transport seam: reqwest in production, canned responses in tests

use crate::error::GitHubError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use std::sync::Mutex;

pub const ACCEPT_V3: &str = "application/vnd.github.v3+json";
pub const CLIENT_USER_AGENT: &str = "Daily-Dashboard";

/// Issues one authenticated GET and returns the decoded JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, token: &str, url: &Url) -> Result<Value, GitHubError>;
}

/// reqwest-backed transport against the live API
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, token: &str, url: &Url) -> Result<Value, GitHubError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, ACCEPT_V3)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Status(u16),
}

#[derive(Debug)]
struct Route {
    path: String,
    needle: Option<String>,
    response: Canned,
}

/// Serves canned responses by URL path and records every request (for testing).
///
/// Routes registered with a query needle win over plain path routes; anything
/// unmatched answers 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, needle: Option<&str>, response: Canned) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(Route {
                path: path.to_string(),
                needle: needle.map(String::from),
                response,
            });
        }
    }

    pub fn respond(&self, path: &str, body: Value) -> &Self {
        self.push(path, None, Canned::Body(body));
        self
    }

    /// Respond only when the decoded query string contains `needle`
    pub fn respond_matching(&self, path: &str, needle: &str, body: Value) -> &Self {
        self.push(path, Some(needle), Canned::Body(body));
        self
    }

    pub fn fail(&self, path: &str, status: u16) -> &Self {
        self.push(path, None, Canned::Status(status));
        self
    }

    /// Full URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Decoded `path?query` strings requested so far
    pub fn decoded_requests(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .map(|u| format!("{}?{}", u.path(), decoded_query(&u)))
            .collect()
    }
}

fn decoded_query(url: &Url) -> String {
    url.query_pairs()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, _token: &str, url: &Url) -> Result<Value, GitHubError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        let query = decoded_query(url);
        let canned = self.routes.lock().ok().and_then(|routes| {
            let on_path: Vec<&Route> = routes.iter().filter(|r| r.path == url.path()).collect();
            on_path
                .iter()
                .find(|r| r.needle.as_deref().is_some_and(|n| query.contains(n)))
                .or_else(|| on_path.iter().find(|r| r.needle.is_none()))
                .map(|r| r.response.clone())
        });

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(GitHubError::Status {
                status,
                url: url.to_string(),
            }),
            None => Err(GitHubError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_prefers_needle_routes() {
        let mock = MockTransport::new();
        mock.respond("/search/issues", serde_json::json!({"total_count": 1}))
            .respond_matching(
                "/search/issues",
                "author:octocat",
                serde_json::json!({"total_count": 9}),
            );

        let url = Url::parse("https://api.github.com/search/issues?q=author%3Aoctocat").unwrap();
        let body = mock.get_json("t", &url).await.unwrap();
        assert_eq!(body["total_count"], 9);

        let url = Url::parse("https://api.github.com/search/issues?q=involves%3Aoctocat").unwrap();
        let body = mock.get_json("t", &url).await.unwrap();
        assert_eq!(body["total_count"], 1);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_unrouted_is_404() {
        let mock = MockTransport::new();
        mock.fail("/users/octocat/events", 500);

        let url = Url::parse("https://api.github.com/users/octocat/events").unwrap();
        match mock.get_json("t", &url).await {
            Err(GitHubError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected status error, got {:?}", other),
        }

        let url = Url::parse("https://api.github.com/nowhere").unwrap();
        assert!(matches!(
            mock.get_json("t", &url).await,
            Err(GitHubError::Status { status: 404, .. })
        ));
    }
}
