use ogmap_domain::config::LoggingConfig;
use ogmap_logger::Logger;

#[test]
fn default_config_logs_to_console_only() {
    let logger = Logger::from_config("integration-console-only", &LoggingConfig::default())
        .expect("logger should initialize");

    assert!(!logger.has_file_output(), "console-only logger should not create a file guard");
}
