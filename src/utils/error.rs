use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhostError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API responded with status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response envelope is missing the '{key}' array")]
    Envelope { key: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，讓上層可以區分「找不到」與「CMS 無法連線」
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Transport,
    Decode,
    Config,
}

impl GhostError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GhostError::Status { status: 404, .. } => ErrorCategory::NotFound,
            GhostError::Transport(e) if e.is_decode() => ErrorCategory::Decode,
            GhostError::Transport(_) | GhostError::Status { .. } => ErrorCategory::Transport,
            GhostError::Decode(_) | GhostError::Envelope { .. } => ErrorCategory::Decode,
            GhostError::InvalidUrl(_)
            | GhostError::IoError(_)
            | GhostError::ConfigError { .. }
            | GhostError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::NotFound => "The requested content does not exist".to_string(),
            ErrorCategory::Transport => format!("Could not reach the Ghost content API: {}", self),
            ErrorCategory::Decode => format!("The Ghost content API returned unexpected data: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GhostError::Status { status: 401 | 403, .. } => {
                "Check that GHOST_CONTENT_API_KEY holds a valid content API key"
            }
            _ => match self.category() {
                ErrorCategory::NotFound => "Check the slug for typos or a trailing slash",
                ErrorCategory::Transport => {
                    "Check that GHOST_API_URL points at a running Ghost instance (try the `probe` command)"
                }
                ErrorCategory::Decode => "Check that the API URL points at the Ghost content API",
                ErrorCategory::Config => "Fix the configuration value and try again",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, GhostError>;
