pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::app::pages::{Page, SiteService};
pub use crate::config::GhostConfig;
pub use crate::core::{client::GhostClient, fetch::Fetch};
pub use crate::domain::model::{Author, Post, PostCount, Tag};
pub use crate::domain::ports::ContentSource;
pub use crate::utils::error::{ErrorCategory, GhostError, Result};
