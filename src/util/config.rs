use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::infra::{
    budget_api::{CITY_RETRY, DEFAULT_BASE_URL, REQUEST_TIMEOUT},
    retry::RetryPolicy,
};

const APP_QUALIFIER: &str = "in";
const APP_ORG: &str = "WealthSync";
const APP_NAME: &str = "WealthSyncPlanner";

/// Overrides the configured service base URL.
pub const API_URL_ENV: &str = "WEALTHSYNC_API_URL";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_secs: u64,
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.delay_secs))
    }
}

impl From<RetryPolicy> for RetrySettings {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            delay_secs: policy.delay.as_secs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub city_retry: RetrySettings,
    pub default_retry: RetrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT.as_secs(),
            city_retry: CITY_RETRY.into(),
            default_retry: RetryPolicy::default().into(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_env(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            debug!(%url, "Using API base URL from environment");
            self.api_base_url = url;
        }
        self
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Defaults, overlaid with `config.json` if present, then the environment.
/// A config file that cannot be read is reported and ignored.
pub fn load_config() -> AppConfig {
    let from_file = match config_file() {
        Some(path) if path.exists() => match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Ignoring unreadable config file");
                AppConfig::default()
            }
        },
        _ => AppConfig::default(),
    };
    from_file.apply_env(std::env::var(API_URL_ENV).ok())
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_call_table() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.city_retry.policy(), RetryPolicy::new(5, Duration::from_secs(10)));
        assert_eq!(config.default_retry.policy(), RetryPolicy::new(3, Duration::from_secs(5)));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api_base_url": "http://127.0.0.1:5000/api/"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:5000/api/");
        assert_eq!(config.city_retry.max_attempts, 5);
    }

    #[test]
    fn env_override_wins_unless_blank() {
        let config = AppConfig::default().apply_env(Some("http://localhost:1/api".into()));
        assert_eq!(config.api_base_url, "http://localhost:1/api");

        let config = AppConfig::default().apply_env(Some("  ".into()));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_file_reports_serde_error() {
        let dir = std::env::temp_dir().join(format!("wealthsync-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_config(&path), Err(ConfigError::Serde(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
