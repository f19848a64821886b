//! Tests for logging configuration.

use lagdiff_cli::logging::{LogConfig, LogFormat, REDACTED_VALUE, log_data_enabled, redact_value};
use tracing::level_filters::LevelFilter;

#[test]
fn default_config_is_warn_and_redacted() {
    let config = LogConfig::default();
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.use_env_filter);
    assert!(!config.log_data);
}

#[test]
fn directives_keep_dependencies_at_warn() {
    let config = LogConfig::default().with_level_filter(LevelFilter::DEBUG);
    let directives = config.filter_directives();
    assert!(directives.starts_with("warn,"));
    assert!(directives.contains("lagdiff_transform=debug"));
    assert!(directives.contains("lagdiff_ingest=debug"));
}

#[test]
fn directives_quiet_everything_below_warn() {
    let config = LogConfig::default().with_level_filter(LevelFilter::ERROR);
    assert!(config.filter_directives().starts_with("error,"));
}

#[test]
fn values_are_redacted_without_log_data() {
    assert!(!log_data_enabled());
    assert_eq!(redact_value("2024-01-01"), REDACTED_VALUE);
}
