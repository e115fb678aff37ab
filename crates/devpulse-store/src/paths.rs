//! Path resolution for the dashboard config slot

use crate::error::StoreError;
use std::path::PathBuf;

/// Environment variable overriding the storage directory
pub const HOME_ENV: &str = "DEVPULSE_HOME";

const CONFIG_FILE: &str = "dashboard-config.json";

/// Resolves standard storage paths
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
}

impl Paths {
    /// Resolve from `DEVPULSE_HOME`, falling back to the platform config dir
    pub fn new() -> Result<Self, StoreError> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self {
                home: PathBuf::from(home),
            });
        }

        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self {
            home: config_dir.join("devpulse"),
        })
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get the single config storage slot
    pub fn config_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }
}
