use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_configured_level_is_used_without_rust_log() {
    std::env::remove_var("RUST_LOG");
    let config = LoggingConfig {
        level: "trigger_gateway_core=debug".to_string(),
        json_format: false,
    };
    assert_eq!(env_filter(&config).to_string(), "trigger_gateway_core=debug");
}

#[test]
#[serial]
fn test_rust_log_wins_over_configured_level() {
    std::env::set_var("RUST_LOG", "warn");
    let filter = env_filter(&LoggingConfig::default());
    std::env::remove_var("RUST_LOG");

    assert_eq!(filter.to_string(), "warn");
}

#[test]
#[serial]
fn test_second_init_leaves_subscriber_in_place() {
    init_logging(&LoggingConfig::default());
    assert!(!init_logging(&LoggingConfig {
        level: "debug".to_string(),
        json_format: true,
    }));
}
