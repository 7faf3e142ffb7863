//! Logger initialization for the server binary.

use env_logger::{Builder, Target, WriteStyle};
use fileops_config::{LogLevel, LoggingConfig};

/// Install `env_logger` writing to stderr.
///
/// The configured level applies first, `RUST_LOG` refines it and an explicit
/// override wins over both. Stdout carries protocol traffic only.
pub fn init_logging(config: &LoggingConfig, level_override: Option<LogLevel>) {
    let mut builder = build_logger(config, level_override);
    let _ = builder.try_init();
}

fn build_logger(config: &LoggingConfig, level_override: Option<LogLevel>) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(config.level.as_filter())
        .parse_default_env()
        .format_timestamp_millis()
        .target(Target::Stderr)
        .write_style(if config.pretty {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        });
    if let Some(level) = level_override {
        builder.filter_level(level.as_filter());
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::build_logger;
    use fileops_config::{LogLevel, LoggingConfig};
    use log::LevelFilter;
    use pretty_assertions::assert_eq;

    #[test]
    fn override_wins_over_configured_level() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            pretty: false,
        };
        let logger = build_logger(&config, Some(LogLevel::Error)).build();
        assert_eq!(logger.filter(), LevelFilter::Error);
    }
}
