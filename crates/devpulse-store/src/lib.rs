//! Persisted dashboard configuration and query bookkeeping

mod config;
mod error;
mod generation;
mod io;
mod paths;
mod provider;

pub use config::{Credentials, DashboardConfig, ServiceConfig};
pub use error::StoreError;
pub use generation::{Generations, QueryFamily, Ticket};
pub use io::{atomic_write, read_json};
pub use paths::Paths;
pub use provider::{ConfigProvider, ConfigStore, MemoryConfigProvider};
