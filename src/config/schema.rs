//! Configuration schema types
//!
//! This module defines the configuration structure for Veil. Every section
//! and field has a default, so an empty file is a valid configuration.

use crate::anonymizer::StrategyConfig;
use crate::config::SecretString;
use crate::domain::EntityType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Analyzer settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Anonymizer settings
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.analyzer.validate()?;
        self.anonymizer.validate()?;
        self.logging.validate()?;

        // Without a fallback every analyzed entity type needs its own strategy
        if !self.anonymizer.fallback_to_default {
            let configured = self.anonymizer.configured_entities()?;
            for entity in self.analyzer.entity_types()? {
                if !configured.contains(&entity) {
                    return Err(format!(
                        "anonymizer.strategies has no entry for {entity} and fallback_to_default is false"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Largest accepted text, in characters
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }

        if !(1..=300).contains(&self.request_timeout_seconds) {
            return Err(format!(
                "server.request_timeout_seconds must be between 1 and 300, got {}",
                self.request_timeout_seconds
            ));
        }

        if self.max_text_chars == 0 {
            return Err("server.max_text_chars must be > 0".to_string());
        }

        Ok(())
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout_seconds(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Language used when a request does not specify one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Spans scoring below this are dropped
    #[serde(default)]
    pub score_threshold: f64,

    /// Entity types analyzed when a request does not list any
    #[serde(default = "default_entities")]
    pub entities: Vec<String>,

    /// Values never reported (case-insensitive exact match)
    #[serde(default)]
    pub allow_list: Vec<String>,

    /// Custom pattern library replacing the built-in one
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

impl AnalyzerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_language.trim().is_empty() {
            return Err("analyzer.default_language cannot be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(format!(
                "analyzer.score_threshold must be between 0.0 and 1.0, got {}",
                self.score_threshold
            ));
        }

        self.entity_types()?;

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!(
                    "analyzer.pattern_library file not found: {}",
                    path.display()
                ));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "analyzer.pattern_library must be a TOML file: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }

    /// Parsed default entity types
    pub fn entity_types(&self) -> Result<Vec<EntityType>, String> {
        self.entities
            .iter()
            .map(|name| {
                name.parse::<EntityType>()
                    .map_err(|_| format!("Invalid entity type in analyzer.entities: '{name}'"))
            })
            .collect()
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            score_threshold: 0.0,
            entities: default_entities(),
            allow_list: vec![],
            pattern_library: None,
        }
    }
}

/// Anonymizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Strategy for entity types without their own entry
    #[serde(default)]
    pub default_strategy: StrategyConfig,

    /// Apply `default_strategy` to unmapped entity types; when false they fail
    #[serde(default = "default_true")]
    pub fallback_to_default: bool,

    /// Stable key for the hash strategy
    ///
    /// Without it hashed values are salted per request and cannot be
    /// correlated across requests. Stored securely in memory and zeroized on drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<SecretString>,

    /// Per-entity strategies keyed by entity type label
    #[serde(default)]
    pub strategies: HashMap<String, StrategyConfig>,
}

impl AnonymizerConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        self.configured_entities()?;

        if let Some(ref key) = self.hash_key {
            if key.expose_secret().is_empty() {
                return Err("anonymizer.hash_key cannot be empty when set".to_string());
            }
        }

        Ok(())
    }

    /// Entity types with an explicit strategy
    pub fn configured_entities(&self) -> Result<Vec<EntityType>, String> {
        self.strategies
            .keys()
            .map(|name| {
                name.parse::<EntityType>()
                    .map_err(|_| format!("Invalid entity type in anonymizer.strategies: '{name}'"))
            })
            .collect()
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            default_strategy: StrategyConfig::default(),
            fallback_to_default: true,
            hash_key: None,
            strategies: HashMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Console output as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_max_text_chars() -> usize {
    100_000
}

fn default_language() -> String {
    "en".to_string()
}

fn default_entities() -> Vec<String> {
    EntityType::ALL
        .iter()
        .map(|entity| entity.label().to_string())
        .collect()
}

fn default_local_path() -> String {
    "/var/log/veil".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
