//! Dashboard configuration model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-service settings (only GitHub is wired up)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub credentials: Credentials,

    /// Selected repositories as `owner/name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<String>>,

    /// Selected branch per repository full name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<BTreeMap<String, String>>,
}

impl ServiceConfig {
    pub fn selected_repositories(&self) -> &[String] {
        self.repositories.as_deref().unwrap_or(&[])
    }

    pub fn branch_for(&self, repository: &str) -> Option<&str> {
        self.branches
            .as_ref()
            .and_then(|b| b.get(repository))
            .map(String::as_str)
    }
}

/// Whole persisted config; replaced as a unit on every write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub github: ServiceConfig,
}

/// Credential map for a service (`token`, `username`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(pub BTreeMap<String, String>);

impl Credentials {
    pub fn new(token: &str, username: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert("token".to_string(), token.to_string());
        map.insert("username".to_string(), username.to_string());
        Self(map)
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.get("token")
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username")
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn is_complete(&self) -> bool {
        self.token().is_some() && self.username().is_some()
    }
}
