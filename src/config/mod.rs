#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:2368";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const CONTENT_API_PATH: &str = "/ghost/api/content";

pub const ENV_API_URL: &str = "GHOST_API_URL";
pub const ENV_CONTENT_API_KEY: &str = "GHOST_CONTENT_API_KEY";
pub const ENV_TIMEOUT_SECONDS: &str = "GHOST_TIMEOUT_SECONDS";

/// Ghost 連線設定；建立後不再變動，由 client 持有
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub content_api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl GhostConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_origin(&api_url.into()),
            content_api_key: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn with_content_api_key(mut self, key: impl Into<String>) -> Self {
        self.content_api_key = key.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// 從環境變數讀取，未設定時使用預設值
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_api_url);
        let key = lookup(ENV_CONTENT_API_KEY).unwrap_or_default();

        let mut config = Self::new(api_url).with_content_api_key(key);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            match raw.trim().parse::<u64>() {
                Ok(seconds) => config.timeout_seconds = seconds,
                Err(_) => tracing::warn!(
                    "Ignoring {}={:?}: not a number, using {}s",
                    ENV_TIMEOUT_SECONDS,
                    raw,
                    DEFAULT_TIMEOUT_SECONDS
                ),
            }
        }
        config
    }

    /// Root of every content API request, e.g. `http://localhost:2368/ghost/api/content`.
    pub fn api_base(&self) -> String {
        format!("{}{}", normalize_origin(&self.api_url), CONTENT_API_PATH)
    }

    pub fn has_api_key(&self) -> bool {
        !self.content_api_key.is_empty()
    }

    /// Startup log line; the key itself is never printed.
    pub fn log_summary(&self) {
        tracing::info!("Ghost base URL: {}", self.api_url);
        tracing::info!("Using API URL: {}", self.api_base());
        tracing::info!(
            "API key available: {}",
            if self.has_api_key() { "yes (masked)" } else { "no" }
        );
    }
}

impl Validate for GhostConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_url", &self.api_url)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

pub(crate) fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}
