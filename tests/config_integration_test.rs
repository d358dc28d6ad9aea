//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use veil::anonymizer::StrategyConfig;
use veil::config::{load_config, load_config_or_default};
use veil::domain::{EntityType, VeilError};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VEIL_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VEIL_SERVER_PORT");
    std::env::remove_var("VEIL_ANALYZER_ENTITIES");
    std::env::remove_var("VEIL_ANALYZER_SCORE_THRESHOLD");
    std::env::remove_var("VEIL_ANONYMIZER_HASH_KEY");
    std::env::remove_var("TEST_VEIL_HASH_KEY");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r##"
[application]
log_level = "debug"

[server]
host = "0.0.0.0"
port = 8080
request_timeout_seconds = 30
max_text_chars = 5000

[analyzer]
default_language = "en"
score_threshold = 0.5
entities = ["PERSON", "EMAIL", "US_SSN"]
allow_list = ["support@example.com"]

[anonymizer]
fallback_to_default = true

[anonymizer.default_strategy]
type = "mask"
masking_char = "#"

[anonymizer.strategies.PERSON]
type = "replace"
new_value = "[name]"

[logging]
local_enabled = false
local_rotation = "hourly"
json = true
"##,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    assert_eq!(config.server.request_timeout_seconds, 30);
    assert_eq!(config.server.max_text_chars, 5000);
    assert_eq!(config.analyzer.score_threshold, 0.5);
    assert_eq!(
        config.analyzer.entity_types().unwrap(),
        vec![
            EntityType::Person,
            EntityType::EmailAddress,
            EntityType::NationalId
        ]
    );
    assert_eq!(config.analyzer.allow_list, vec!["support@example.com"]);
    assert_eq!(
        config.anonymizer.default_strategy,
        StrategyConfig::Mask { masking_char: '#' }
    );
    assert_eq!(
        config.anonymizer.strategies["PERSON"],
        StrategyConfig::Replace {
            new_value: Some("[name]".to_string())
        }
    );
    assert!(config.logging.json);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.analyzer.default_language, "en");
    assert_eq!(config.analyzer.entities.len(), 8);
    assert!(config.anonymizer.fallback_to_default);
    assert!(config.anonymizer.hash_key.is_none());
}

#[test]
fn test_missing_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let result = load_config("/nonexistent/veil.toml");
    assert!(matches!(result, Err(VeilError::Configuration(_))));

    let config = load_config_or_default("/nonexistent/veil.toml").unwrap();
    assert_eq!(config.server.port, 5000);
}

#[test]
fn test_env_var_substitution_keeps_secret() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_VEIL_HASH_KEY", "substituted-pepper");
    let file = write_config(
        r#"
[anonymizer]
hash_key = "${TEST_VEIL_HASH_KEY}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    let key = config.anonymizer.hash_key.as_ref().unwrap();
    assert_eq!(key.expose_secret(), "substituted-pepper");
    assert!(!format!("{:?}", config.anonymizer).contains("substituted-pepper"));

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[anonymizer]
hash_key = "${TEST_VEIL_HASH_KEY}"
"#,
    );
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("VEIL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("VEIL_SERVER_PORT", "9090");
    std::env::set_var("VEIL_ANALYZER_ENTITIES", "PERSON, IP_ADDRESS");
    std::env::set_var("VEIL_ANALYZER_SCORE_THRESHOLD", "0.25");
    std::env::set_var("VEIL_ANONYMIZER_HASH_KEY", "env-pepper");

    let file = write_config(
        r#"
[application]
log_level = "info"

[server]
port = 5000
"#,
    );
    let config = load_config(file.path());
    cleanup_env_vars();

    let config = config.unwrap();
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.server.port, 9090);
    assert_eq!(
        config.analyzer.entity_types().unwrap(),
        vec![EntityType::Person, EntityType::IpAddress]
    );
    assert_eq!(config.analyzer.score_threshold, 0.25);
    assert_eq!(
        config.anonymizer.hash_key.unwrap().expose_secret(),
        "env-pepper"
    );
}

#[test]
fn test_invalid_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("VEIL_SERVER_PORT", "not-a-port");
    let result = load_config(write_config("").path());
    cleanup_env_vars();

    assert!(matches!(result, Err(VeilError::Configuration(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n",
        "[server]\nrequest_timeout_seconds = 0\n",
        "[analyzer]\nscore_threshold = 1.5\n",
        "[analyzer]\nentities = [\"PASSPORT\"]\n",
        "[analyzer]\npattern_library = \"/nonexistent/patterns.toml\"\n",
        "[anonymizer]\nhash_key = \"\"\n",
        "[anonymizer.strategies.PASSPORT]\ntype = \"redact\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for case in cases {
        let result = load_config(write_config(case).path());
        assert!(result.is_err(), "accepted invalid config: {case}");
    }
}
