//! Config providers: the on-disk store and an in-memory fixture

use crate::config::{Credentials, DashboardConfig, ServiceConfig};
use crate::error::StoreError;
use crate::io::{atomic_write, read_json};
use crate::paths::Paths;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Source of dashboard configuration, injected wherever config is read
pub trait ConfigProvider: Send + Sync {
    /// Current config merged over defaults; never fails
    fn load(&self) -> DashboardConfig;

    /// Persist the whole config, reporting failures
    fn try_save(&self, config: &DashboardConfig) -> Result<(), StoreError>;

    /// Persist the whole config; failures are logged and dropped
    fn save(&self, config: &DashboardConfig) {
        if let Err(e) = self.try_save(config) {
            tracing::warn!(error = %e, "failed to save dashboard config");
        }
    }

    /// Read-modify-write the GitHub service section
    fn update_service(&self, update: impl FnOnce(&mut ServiceConfig))
    where
        Self: Sized,
    {
        let mut config = self.load();
        update(&mut config.github);
        self.save(&config);
    }

    fn is_service_enabled(&self) -> bool {
        self.load().github.enabled
    }

    /// Stored credentials; empty when none were saved
    fn service_credentials(&self) -> Credentials {
        self.load().github.credentials
    }
}

/// JSON file holding the single config slot
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &Paths) -> Self {
        Self::new(paths.config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for ConfigStore {
    fn load(&self) -> DashboardConfig {
        match read_json::<DashboardConfig>(&self.path) {
            Ok(Some(config)) => config,
            Ok(None) => DashboardConfig::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                DashboardConfig::default()
            }
        }
    }

    fn try_save(&self, config: &DashboardConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory provider for fixtures and tests
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<DashboardConfig>,
}

impl MemoryConfigProvider {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> DashboardConfig {
        self.config
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn try_save(&self, config: &DashboardConfig) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.config.write() {
            *slot = config.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_load_without_stored_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("dashboard-config.json"));

        let config = store.load();
        assert!(!config.github.enabled);
        assert!(config.github.credentials.0.is_empty());
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("dashboard-config.json"));

        let mut branches = BTreeMap::new();
        branches.insert("a/x".to_string(), "main".to_string());
        let config = DashboardConfig {
            github: ServiceConfig {
                enabled: true,
                credentials: Credentials::new("ghp_abc", "octocat"),
                repositories: Some(vec!["a/x".to_string(), "a/y".to_string()]),
                branches: Some(branches),
            },
        };

        store.save(&config);
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_corrupt_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard-config.json");
        std::fs::write(&path, "{\"github\": [").unwrap();

        let store = ConfigStore::new(&path);
        assert_eq!(store.load(), DashboardConfig::default());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // Parent is a regular file, so the write cannot succeed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = ConfigStore::new(blocker.join("dashboard-config.json"));

        store.save(&DashboardConfig::default());
        assert!(store.try_save(&DashboardConfig::default()).is_err());
    }

    #[test]
    fn test_update_service() {
        let provider = MemoryConfigProvider::default();
        assert!(provider.service_credentials().0.is_empty());

        provider.update_service(|svc| {
            svc.enabled = true;
            svc.credentials.set("username", "octocat");
        });

        assert!(provider.is_service_enabled());
        assert_eq!(provider.load().github.credentials.username(), Some("octocat"));

        let credentials = provider.service_credentials();
        assert_eq!(credentials.username(), Some("octocat"));
        assert_eq!(credentials.token(), None);
        assert!(!credentials.is_complete());
    }

    #[test]
    fn test_service_credentials_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("dashboard-config.json"));
        assert_eq!(store.service_credentials(), Credentials::default());

        store.update_service(|svc| svc.credentials = Credentials::new("ghp_abc", "octocat"));
        assert_eq!(store.service_credentials(), Credentials::new("ghp_abc", "octocat"));
    }
}
