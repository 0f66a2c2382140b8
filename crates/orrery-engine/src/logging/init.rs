use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` gives one. wgpu and
/// naga are chatty at info level.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Like [`DEFAULT_FILTER`] but with the engine at debug level.
pub const VERBOSE_FILTER: &str = "info,orrery_engine=debug,orrery_viewer=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "orrery_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    pub fn verbose() -> Self {
        Self {
            env_filter: Some(VERBOSE_FILTER.to_string()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        // Another logger may already be installed (tests, embedding).
        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(env)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        let config = LoggingConfig::verbose();
        assert_eq!(resolve_filter(&config, Some("warn".into())), VERBOSE_FILTER);
    }

    #[test]
    fn environment_wins_over_default() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("warn".into())), "warn");
        assert_eq!(resolve_filter(&config, None), DEFAULT_FILTER);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::verbose());
    }
}
