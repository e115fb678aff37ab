pub mod activity;
pub mod branches;
pub mod config;
pub mod dashboard;
pub mod render;
pub mod repos;
pub mod version;

use devpulse_github::{GitHub, HttpTransport, Throttle};
use devpulse_insights::Classifier;
use devpulse_store::{ConfigStore, Paths};
use std::time::Duration;

/// Settings store and GitHub client shared by every command
pub struct Context<P, T> {
    pub store: P,
    pub github: GitHub<T>,
    pub classifier: Classifier,
}

impl Context<ConfigStore, HttpTransport> {
    pub fn live(delay: Duration) -> anyhow::Result<Self> {
        let paths = Paths::new()?;
        tracing::debug!(home = %paths.home.display(), "using config directory");
        Ok(Self {
            store: ConfigStore::from_paths(&paths),
            github: GitHub::live().with_throttle(Throttle::new(delay)),
            classifier: Classifier::default(),
        })
    }
}

#[cfg(test)]
impl<P: devpulse_store::ConfigProvider, T: devpulse_github::Transport> Context<P, T> {
    pub fn new(store: P, github: GitHub<T>) -> Self {
        Self {
            store,
            github,
            classifier: Classifier::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Context;
    use chrono::{DateTime, Utc};
    use devpulse_github::{GitHub, MockTransport, Throttle};
    use devpulse_store::{Credentials, DashboardConfig, MemoryConfigProvider, ServiceConfig};

    pub fn now() -> DateTime<Utc> {
        "2026-10-19T12:00:00Z".parse().unwrap()
    }

    pub fn configured(repos: &[&str]) -> DashboardConfig {
        DashboardConfig {
            github: ServiceConfig {
                enabled: true,
                credentials: Credentials::new("ghp_secret1234", "octocat"),
                repositories: (!repos.is_empty())
                    .then(|| repos.iter().map(|r| r.to_string()).collect()),
                branches: None,
            },
        }
    }

    pub fn context(config: DashboardConfig) -> Context<MemoryConfigProvider, MockTransport> {
        Context::new(
            MemoryConfigProvider::new(config),
            GitHub::new(MockTransport::new())
                .with_throttle(Throttle::none())
                .with_clock(now()),
        )
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_live_context_uses_home_override() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("DEVPULSE_HOME", dir.path());

        let ctx = Context::live(Duration::from_millis(0)).unwrap();
        assert_eq!(ctx.store.path(), dir.path().join("dashboard-config.json"));
        assert_eq!(ctx.github.throttle().delay(), Duration::ZERO);

        std::env::remove_var("DEVPULSE_HOME");
    }
}
