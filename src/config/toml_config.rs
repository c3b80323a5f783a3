use crate::config::{normalize_origin, GhostConfig};
use crate::utils::error::{GhostError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 設定檔格式：
///
/// ```toml
/// [ghost]
/// api_url = "https://cms.example.org"
/// content_api_key = "${GHOST_CONTENT_API_KEY}"
/// timeout_seconds = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub ghost: GhostConfig,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GhostError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| GhostError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.ghost.api_url = normalize_origin(&config.ghost.api_url);
        Ok(config)
    }

    /// 替換環境變數：`${VAR}` 或帶預設值的 `${VAR:-default}`；
    /// 未設定且沒有預設值的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").map_err(|e| {
            GhostError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            match (std::env::var(&caps[1]), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => caps[0].to_string(),
            }
        });

        Ok(result.into_owned())
    }

    pub fn into_ghost_config(self) -> GhostConfig {
        self.ghost
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.ghost.validate()
    }
}

impl GhostConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path).map(TomlConfig::into_ghost_config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        TomlConfig::from_toml_str(content).map(TomlConfig::into_ghost_config)
    }
}
