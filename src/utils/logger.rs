use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "ghost_content";

/// Crate logs at `info` (`debug` when verbose); dependencies such as reqwest
/// and hyper only surface warnings.
fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{}={},warn", CRATE_TARGET, level)
}

/// `RUST_LOG` wins when set.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// 終端機用的精簡格式，輸出到 stderr，stdout 留給 JSON 結果
pub fn init_cli_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(layer)
        .init();
}

/// JSON 格式日誌，方便送進集中式日誌系統
pub fn init_json_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "ghost_content=info,warn");
        assert_eq!(default_directive(true), "ghost_content=debug,warn");
    }

    #[test]
    fn test_default_directive_parses() {
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
    }
}
