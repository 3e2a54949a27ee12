use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "ATRIUM_LOG";
const DEFAULT_LEVEL: &str = "warn";

fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the global subscriber. Output goes to stderr so it never mixes
/// with command output.
pub fn init(debug: bool) {
    let result = tracing_subscriber::registry()
        .with(build_filter(debug))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    // Already installed.
    if result.is_err() {
        tracing::debug!("tracing subscriber was already set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_overrides_environment() {
        assert_eq!(build_filter(true).to_string(), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(false);
    }
}
