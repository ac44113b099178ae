//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use super::test_utils::TestFixture;
use crate::config::{ConfigLoader, DictionaryConfig, LogConfig, PinAssistConfig, Validate};
use crate::data_structures::loose_dictionary::LooseDictionaryConfig;
use crate::error::config::ConfigError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = PinAssistConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.dictionary.store_path, PathBuf::from("tracked_objects.json"));
    assert_eq!(
        LooseDictionaryConfig::from(&config.dictionary),
        LooseDictionaryConfig::default()
    );
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = PinAssistConfig::default();

    config.dictionary.max_key_length = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "dictionary.max_key_length"
    ));

    config.dictionary.max_key_length = 4096;
    assert!(config.validate().is_err());

    config.dictionary.max_key_length = 64;
    config.log.level = "verbose".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

/// Test that an empty store path is rejected.
#[test]
fn test_empty_store_path_is_invalid() {
    let config = DictionaryConfig {
        store_path: PathBuf::new(),
        ..DictionaryConfig::default()
    };
    assert!(config.validate().is_err());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config_file_test.toml",
            r#"
            [dictionary]
            store_path = "data/objects.json"
            max_key_length = 32

            [log]
            json = true
            "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.dictionary.store_path, PathBuf::from("data/objects.json"));
    assert_eq!(config.dictionary.max_key_length, 32);
    assert!(config.log.json);

    // Other values should be defaults
    assert!(config.dictionary.detect_conflicts);
    assert_eq!(config.log.level, LogConfig::default().level);
}

/// Test loading configuration from a JSON file.
#[test]
fn test_load_config_from_json() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config.json",
            r#"{ "dictionary": { "detect_conflicts": false }, "log": { "level": "warn" } }"#,
        )
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_JSON").load().unwrap();

    assert!(!config.dictionary.detect_conflicts);
    assert_eq!(config.log.level, "warn");
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("config_env_test.toml", "[dictionary]\nmax_key_length = 32\n")
        .unwrap();

    fixture.set_env("TEST_ENV__DICTIONARY__MAX_KEY_LENGTH", "48");
    fixture.set_env("TEST_ENV__LOG__LEVEL", "trace");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ENV");
    let config = loader.load().unwrap();

    // Verify environment variables took precedence
    assert_eq!(config.dictionary.max_key_length, 48);
    assert_eq!(config.log.level, "trace");
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("invalid.toml");

    fs::write(&config_path, "[dictionary\nstore_path = objects.json\"\n").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that values failing validation are rejected at load time.
#[test]
fn test_load_rejects_out_of_range_values() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("out_of_range.toml", "[dictionary]\nmax_key_length = 0\n")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_RANGE");
    assert!(matches!(loader.load(), Err(ConfigError::ValueOutOfRange { .. })));
}

/// Test that a missing file and an unknown extension are reported.
#[test]
fn test_load_missing_or_unsupported_file() {
    let dir = tempdir().unwrap();

    let missing = ConfigLoader::new(Some(dir.path().join("missing.toml")), "TEST_MISSING");
    assert!(matches!(missing.load(), Err(ConfigError::FileNotFound(_))));

    let path = dir.path().join("config.ini");
    fs::write(&path, "level = info").unwrap();
    let unsupported = ConfigLoader::new(Some(&path), "TEST_MISSING");
    assert!(matches!(unsupported.load(), Err(ConfigError::ParseError(_))));
}

/// Test that the generated default configuration loads back unchanged.
#[test]
fn test_generated_config_round_trip() {
    let fixture = TestFixture::new().unwrap();
    let toml = toml::to_string_pretty(&PinAssistConfig::default()).unwrap();
    let config_path = fixture.create_file("generated.toml", toml).unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_GENERATED").load().unwrap();
    assert_eq!(config.dictionary.store_path, PathBuf::from("tracked_objects.json"));
    assert_eq!(config.dictionary.max_key_length, 128);
    assert!(!config.log.json);
}

/// Test loading with no file at all.
#[test]
fn test_load_defaults_without_file() {
    let config = ConfigLoader::new(None::<PathBuf>, "TEST_DEFAULTS").load().unwrap();
    assert_eq!(config.dictionary.max_key_length, 128);
    assert_eq!(config.log.level, "info");
}
