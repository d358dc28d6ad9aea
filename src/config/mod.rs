//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//!
//! println!("Listening on {}", config.server.bind_address());
//! println!("Entities: {:?}", config.analyzer.entities);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ServerConfig`] - HTTP bind address, timeout, input size limit
//! - [`AnalyzerConfig`] - Language, score threshold, entities, allow list
//! - [`AnonymizerConfig`] - Default and per-entity strategies, hash key
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [analyzer]
//! score_threshold = 0.4
//! entities = ["PERSON", "EMAIL_ADDRESS", "CREDIT_CARD"]
//!
//! [anonymizer]
//! hash_key = "${VEIL_HASH_KEY}"
//!
//! [anonymizer.strategies.CREDIT_CARD]
//! type = "partial_mask"
//! visible = 4
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    AnalyzerConfig, AnonymizerConfig, ApplicationConfig, LoggingConfig, ServerConfig, VeilConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
