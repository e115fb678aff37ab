//! Shared client plumbing: credentials, URLs, throttling, clock

use crate::error::GitHubError;
use crate::models::Event;
use crate::transport::{HttpTransport, Transport};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use devpulse_store::Credentials;
use reqwest::Url;
use serde::de::DeserializeOwned;

pub const API_BASE: &str = "https://api.github.com";

/// Pause between sequential per-repository requests
pub const DEFAULT_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

/// Observation window for commits, PR counts and stats
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Observation window for the PR list search
pub const PR_SEARCH_WINDOW_DAYS: i64 = 30;

/// Fixed delay applied between serial per-repository calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: std::time::Duration,
}

impl Throttle {
    pub fn new(delay: std::time::Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(std::time::Duration::ZERO)
    }

    pub fn delay(&self) -> std::time::Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

/// Token and username, both present and non-blank
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    pub token: &'a str,
    pub username: &'a str,
}

impl<'a> Auth<'a> {
    pub fn require(credentials: &'a Credentials) -> Result<Self, GitHubError> {
        match (credentials.token(), credentials.username()) {
            (Some(token), Some(username)) => Ok(Self { token, username }),
            _ => Err(GitHubError::MissingCredentials),
        }
    }
}

/// Local midnight `days` days before `now`, as UTC
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let day = now.with_timezone(&Local).date_naive() - Duration::days(days);
    day.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now - Duration::days(days))
}

/// GitHub REST client over a pluggable transport
#[derive(Debug, Clone)]
pub struct GitHub<T> {
    transport: T,
    throttle: Throttle,
    clock: Option<DateTime<Utc>>,
    base: String,
}

impl GitHub<HttpTransport> {
    pub fn live() -> Self {
        Self::new(HttpTransport::new())
    }
}

impl<T: Transport> GitHub<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            throttle: Throttle::default(),
            clock: None,
            base: API_BASE.to_string(),
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Pin "now" (windows, streaks) to a fixed instant
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn throttle(&self) -> Throttle {
        self.throttle
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    pub(crate) fn window_start(&self, days: i64) -> DateTime<Utc> {
        window_start(self.now(), days)
    }

    /// UTC calendar date `days` ago, as used by search date qualifiers
    pub(crate) fn search_date(&self, days: i64) -> NaiveDate {
        (self.now() - Duration::days(days)).date_naive()
    }

    pub(crate) fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, GitHubError> {
        let raw = format!("{}{}", self.base, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params.iter().map(|(k, v)| (*k, v.as_str())))
        };
        url.map_err(|e| GitHubError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    pub(crate) async fn get<D: DeserializeOwned>(
        &self,
        auth: &Auth<'_>,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<D, GitHubError> {
        let url = self.url(path, params)?;
        let body = self.transport.get_json(auth.token, &url).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Best-effort GET: failures are logged and become `None`
    pub(crate) async fn try_get<D: DeserializeOwned>(
        &self,
        auth: &Auth<'_>,
        path: &str,
        params: &[(&str, String)],
    ) -> Option<D> {
        match self.get(auth, path, params).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path, error = %e, "skipping failed GitHub request");
                None
            }
        }
    }

    pub(crate) async fn user_events(&self, auth: &Auth<'_>) -> Option<Vec<Event>> {
        let path = format!("/users/{}/events", auth.username);
        self.try_get(auth, &path, &[("per_page", "100".to_string())])
            .await
    }
}
