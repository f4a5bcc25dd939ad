use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::Duration;

use super::errors::{Result, StdError};

pub const DEFAULT_WAIT_ITERATIONS: u32 = 100;
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_DELETE_ATTEMPTS: u32 = 20;
pub const DEFAULT_DELETE_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_REQUEUE_SECS: u64 = 60;

/// Operator configuration. Every field has a default, so an empty document is valid.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Registry/repository prefix for database images, e.g. `myrepo`
    pub repository: Option<String>,
    /// Return as soon as the claim is written instead of waiting for it to bind
    pub skip_waiting: bool,
    pub pvc_wait: WaitConfig,
    pub delete_retry: RetryConfig,
    /// Requeue delay suggested to the caller when a wait or retry budget runs out
    pub requeue_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository: None,
            skip_waiting: false,
            pvc_wait: WaitConfig::default(),
            delete_retry: RetryConfig::default(),
            requeue_secs: DEFAULT_REQUEUE_SECS,
        }
    }
}

impl Config {
    pub fn from_yaml(document: &str) -> Result<Self> {
        serde_yaml::from_str(document).map_err(|e| StdError::ConfigError(e.to_string()).into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|e| StdError::ConfigError(format!("reading {}: {e}", path.display())))?;
        Self::from_yaml(&document)
    }

    /// Image repository prefix, treating an empty string as unset.
    pub fn image_repository(&self) -> Option<&str> {
        self.repository.as_deref().filter(|r| !r.is_empty())
    }

    pub fn requeue(&self) -> Duration {
        Duration::from_secs(self.requeue_secs)
    }
}

/// Fixed-interval polling budget.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitConfig {
    pub max_iterations: u32,
    pub interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_WAIT_ITERATIONS,
            interval_ms: DEFAULT_WAIT_INTERVAL_MS,
        }
    }
}

impl WaitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Bounded retry budget for a single resource.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_DELETE_ATTEMPTS,
            interval_ms: DEFAULT_DELETE_INTERVAL_MS,
        }
    }
}

impl RetryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
