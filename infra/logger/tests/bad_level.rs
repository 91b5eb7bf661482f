use ogmap_domain::config::LoggingConfig;
use ogmap_logger::{Logger, LoggerError};

#[test]
fn unknown_level_is_rejected_before_install() {
    let config = LoggingConfig { level: "chatty".to_owned(), ..LoggingConfig::default() };

    let err = Logger::from_config("integration-bad-level", &config).expect_err("bad level");

    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
