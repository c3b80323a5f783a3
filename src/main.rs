use clap::Parser;
use ghost_content::core::probe;
use ghost_content::utils::{logger, validation::Validate};
use ghost_content::{CliConfig, Command, ContentSource, Fetch, GhostClient, SiteService};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting ghost-content CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli.command);
    }

    // 驗證配置
    let config = match cli.resolve_ghost_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    config.log_summary();

    let client = GhostClient::new(config)?;

    let degraded = match cli.command {
        Command::Posts {
            limit,
            page,
            filter,
        } => emit(client.list_posts(limit, page, filter.as_deref()).await)?,
        Command::Post { slug } => emit(client.get_post_by_slug(&slug).await)?,
        Command::TagPosts { slug, limit, page } => {
            emit(client.list_posts_by_tag(&slug, limit, page).await)?
        }
        Command::Tags { limit } => emit(client.list_tags(limit).await)?,
        Command::Tag { slug } => emit(client.get_tag_by_slug(&slug).await)?,
        Command::Authors { limit } => emit(client.list_authors(limit).await)?,
        Command::Author { slug } => emit(client.get_author_by_slug(&slug).await)?,
        Command::AuthorPosts { slug, limit, page } => {
            emit(client.list_posts_by_author(&slug, limit, page).await)?
        }
        Command::Home => {
            let home = SiteService::new(client).home().await;
            print_json(&home)?;
            home.degraded
        }
        Command::Probe => {
            let report = probe::probe_api(client.config()).await?;
            print_json(&report)?;
            !report.success()
        }
    };

    // 結果來自 fallback 時以 2 結束，讓腳本能分辨 CMS 無法連線
    if degraded {
        std::process::exit(2);
    }

    Ok(())
}

fn emit<T: Serialize>(fetch: Fetch<T>) -> serde_json::Result<bool> {
    if let Some(cause) = fetch.cause() {
        tracing::error!("❌ Request failed: {} (Category: {:?})", cause, cause.category());
        tracing::error!("💡 Recovery suggestion: {}", cause.recovery_suggestion());
        eprintln!("❌ {}", cause.user_friendly_message());
        eprintln!("💡 建議: {}", cause.recovery_suggestion());
    }

    print_json(fetch.value())?;
    Ok(fetch.is_fallback())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
