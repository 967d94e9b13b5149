//! Tests for the logging configuration

use super::*;

#[test]
fn test_log_level_display() {
    assert_eq!(LogLevel::Trace.to_string(), "trace");
    assert_eq!(LogLevel::Debug.to_string(), "debug");
    assert_eq!(LogLevel::Info.to_string(), "info");
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Error.to_string(), "error");
}

#[test]
fn test_log_level_parse() {
    assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
    assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
    assert!("loud".parse::<LogLevel>().is_err());
    assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Text);
    assert_eq!(config.output, LogOutput::Console);
    assert!(config.include_target);
    assert!(!config.include_thread_id);
    assert!(!config.include_file_info);
    assert_eq!(config.rotation, RotationStrategy::Daily);
}

#[test]
fn test_logging_config_builder() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Debug)
        .with_format(LogFormat::Json)
        .with_output(LogOutput::File)
        .with_target(false)
        .with_thread_id(true)
        .with_file_info(true)
        .with_rotation(RotationStrategy::Hourly)
        .with_module_level("sfs_client::api", LogLevel::Trace);

    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output, LogOutput::File);
    assert!(!config.include_target);
    assert!(config.include_thread_id);
    assert!(config.include_file_info);
    assert_eq!(config.rotation, RotationStrategy::Hourly);
    assert_eq!(
        config.module_levels.get("sfs_client::api"),
        Some(&LogLevel::Trace)
    );
}

#[test]
fn test_development_preset() {
    let dev = LoggingConfig::development();
    assert_eq!(dev.level, LogLevel::Debug);
    assert_eq!(dev.output, LogOutput::Console);
    assert!(dev.include_file_info);
    assert!(dev.include_thread_id);
}

#[test]
fn test_filter_directives_are_sorted_after_base_level() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Warn)
        .with_module_level("sfs_client::search", LogLevel::Debug)
        .with_module_level("sfs_client::api", LogLevel::Trace);

    assert_eq!(
        config.filter_directives(),
        "warn,sfs_client::api=trace,sfs_client::search=debug"
    );
    assert!(EnvFilter::try_new(config.filter_directives()).is_ok());
}

#[test]
fn test_output_file_flag() {
    assert!(!LogOutput::Console.writes_file());
    assert!(LogOutput::File.writes_file());
    assert!(LogOutput::Both.writes_file());
}

#[test]
fn test_resolved_log_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig::new().with_log_directory(dir.path());
    assert_eq!(config.resolved_log_directory(), dir.path());

    let default = LoggingConfig::new();
    assert!(default.resolved_log_directory().ends_with("logs"));
}

#[test]
fn test_config_serde_lowercase() {
    let config = LoggingConfig::new()
        .with_format(LogFormat::Json)
        .with_output(LogOutput::Both);
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["level"], "info");
    assert_eq!(json["output"], "both");
    assert_eq!(json["format"], "json");
    assert_eq!(json["rotation"], "daily");

    let parsed: LoggingConfig = serde_json::from_value(serde_json::json!({
        "level": "debug",
        "format": "text",
        "output": "file",
        "log_directory": null
    }))
    .unwrap();
    assert_eq!(parsed.level, LogLevel::Debug);
    assert!(parsed.include_target);
}
