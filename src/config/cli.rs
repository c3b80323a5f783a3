use crate::config::GhostConfig;
use crate::domain::ports::{
    DEFAULT_AUTHORS_LIMIT, DEFAULT_AUTHOR_POSTS_LIMIT, DEFAULT_PAGE, DEFAULT_POSTS_LIMIT,
    DEFAULT_TAGS_LIMIT, DEFAULT_TAG_POSTS_LIMIT,
};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ghost-content")]
#[command(about = "Query a Ghost CMS content API and print the results as JSON")]
pub struct CliConfig {
    /// TOML config file with a [ghost] table
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ghost origin (overrides GHOST_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Content API key (overrides GHOST_CONTENT_API_KEY)
    #[arg(long)]
    pub key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List posts
    Posts {
        #[arg(long, default_value_t = DEFAULT_POSTS_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        /// Ghost filter expression, e.g. featured:true
        #[arg(long)]
        filter: Option<String>,
    },
    /// Fetch a single post by slug
    Post { slug: String },
    /// List posts carrying a tag
    TagPosts {
        slug: String,
        #[arg(long, default_value_t = DEFAULT_TAG_POSTS_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
    },
    /// List tags with post counts
    Tags {
        #[arg(long, default_value_t = DEFAULT_TAGS_LIMIT)]
        limit: u32,
    },
    /// Fetch a single tag by slug
    Tag { slug: String },
    /// List authors with post counts
    Authors {
        #[arg(long, default_value_t = DEFAULT_AUTHORS_LIMIT)]
        limit: u32,
    },
    /// Fetch a single author by slug
    Author { slug: String },
    /// List posts written by an author
    AuthorPosts {
        slug: String,
        #[arg(long, default_value_t = DEFAULT_AUTHOR_POSTS_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
    },
    /// Assemble the home page sections
    Home,
    /// Try the known API prefixes and report which one answers
    Probe,
}

impl CliConfig {
    /// 設定優先順序：命令列參數 > 設定檔 > 環境變數 > 預設值
    pub fn resolve_ghost_config(&self) -> Result<GhostConfig> {
        let mut config = match &self.config {
            Some(path) => GhostConfig::from_file(path)?,
            None => GhostConfig::from_env(),
        };

        if let Some(api_url) = &self.api_url {
            config = GhostConfig::new(api_url.clone())
                .with_content_api_key(config.content_api_key)
                .with_timeout_seconds(config.timeout_seconds);
        }
        if let Some(key) = &self.key {
            config.content_api_key = key.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_posts_defaults() {
        let cli = CliConfig::parse_from(["ghost-content", "posts"]);
        match cli.command {
            Command::Posts {
                limit,
                page,
                filter,
            } => {
                assert_eq!(limit, 10);
                assert_eq!(page, 1);
                assert_eq!(filter, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tag_posts_defaults() {
        let cli = CliConfig::parse_from(["ghost-content", "tag-posts", "news"]);
        match cli.command {
            Command::TagPosts { slug, limit, page } => {
                assert_eq!(slug, "news");
                assert_eq!(limit, 20);
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = CliConfig::parse_from([
            "ghost-content",
            "--api-url",
            "https://cms.example.org/",
            "--key",
            "abc123",
            "--timeout",
            "3",
            "tags",
        ]);
        let config = cli.resolve_ghost_config().unwrap();

        assert_eq!(config.api_url, "https://cms.example.org");
        assert_eq!(config.content_api_key, "abc123");
        assert_eq!(config.timeout_seconds, 3);
    }
}
