//! Integration tests for configuration validation and loading

#![allow(clippy::expect_used, clippy::unwrap_used)]

use cluster_protocol::config::{CodecConfig, LoggingConfig, ProtocolConfig, MAX_FRAME_SIZE};
use cluster_protocol::core::codec::FrameCodec;
use cluster_protocol::error::ProtocolError;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = ProtocolConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_zero_max_list_len() {
    let mut config = ProtocolConfig::default();
    config.codec.max_list_len = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max list length must be greater than 0")));
}

#[test]
fn test_list_len_beyond_prefix_range() {
    let mut config = ProtocolConfig::default();
    config.codec.max_list_len = u32::MAX as usize + 1;

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max list length too large")));
}

#[test]
fn test_blob_larger_than_frame() {
    let mut config = ProtocolConfig::default();
    config.codec.max_blob_len = config.codec.max_frame_size + 1;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max blob length cannot be larger than max frame size")));
}

#[test]
fn test_tiny_max_frame_size() {
    let mut config = ProtocolConfig::default();
    config.codec.max_frame_size = 100;
    config.codec.max_blob_len = 50;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max frame size too small")));
}

#[test]
fn test_empty_app_name() {
    let mut config = ProtocolConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_log_to_file_without_path() {
    let mut config = ProtocolConfig::default();
    config.logging.log_to_file = true;
    config.logging.log_file_path = None;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("log_file_path must be specified")));
}

#[test]
fn test_no_logging_outputs() {
    let mut config = ProtocolConfig::default();
    config.logging.log_to_console = false;
    config.logging.log_to_file = false;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("At least one logging output")));
}

#[test]
fn test_validate_strict_with_invalid_config() {
    let config = ProtocolConfig::default_with_overrides(|c| {
        c.codec.max_list_len = 0;
        c.logging.app_name = String::new();
    });

    match config.validate_strict() {
        Err(ProtocolError::ConfigError(msg)) => {
            assert!(msg.contains("Configuration validation failed"));
            assert!(msg.contains("Max list length"));
            assert!(msg.contains("Application name"));
        }
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = ProtocolConfig::from_toml(
        r#"
        [codec]
        max_list_len = 4096
        max_blob_len = 65536
        max_frame_size = 1048576
        "#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.codec.max_list_len, 4096);
    assert_eq!(config.codec.limits().max_blob_len, 65536);
    assert_eq!(config.logging.app_name, "cluster-protocol");
    assert!(config.validate().is_empty());
}

#[test]
fn test_malformed_toml() {
    assert!(matches!(
        ProtocolConfig::from_toml("[codec\nmax_list_len = "),
        Err(ProtocolError::ConfigError(_))
    ));
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cluster.toml");

    let config = ProtocolConfig {
        codec: CodecConfig {
            max_list_len: 10_000,
            max_blob_len: 1024 * 1024,
            max_frame_size: 2 * 1024 * 1024,
        },
        logging: LoggingConfig {
            app_name: "slave-s001".to_string(),
            log_level: Level::DEBUG,
            ..LoggingConfig::default()
        },
    };
    config.save_to_file(&path).expect("Failed to save config");

    let loaded = ProtocolConfig::from_file(&path).expect("Failed to load config");
    assert_eq!(loaded.codec.max_list_len, 10_000);
    assert_eq!(loaded.logging.app_name, "slave-s001");
    assert_eq!(loaded.logging.log_level, Level::DEBUG);
}

#[test]
fn test_example_config_parses() {
    let example = ProtocolConfig::example_config();
    let parsed = ProtocolConfig::from_toml(&example).expect("Example config should parse");
    assert_eq!(parsed.codec.max_frame_size, MAX_FRAME_SIZE);
}

#[test]
fn test_codec_follows_config() {
    let config = CodecConfig {
        max_frame_size: 4096,
        ..CodecConfig::default()
    };
    assert_eq!(FrameCodec::from(&config).max_frame_size(), 4096);
}
