//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use super::secret::secret_string;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VeilConfig
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from a file, or from defaults when the file is absent
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::info!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );
    finish(VeilConfig::default())
}

/// Parses configuration from TOML content
///
/// Performs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<VeilConfig> {
    let contents = substitute_env_vars(contents)?;

    let config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

fn finish(mut config: VeilConfig) -> Result<VeilConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Reads and parses an override variable
fn env_override<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            VeilError::Configuration(format!("Invalid value for {name}: '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using VEIL_* prefix
///
/// Environment variables follow the pattern: VEIL_<SECTION>_<KEY>
/// For example: VEIL_SERVER_PORT, VEIL_ANALYZER_SCORE_THRESHOLD
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("VEIL_APPLICATION_LOG_LEVEL")? {
        config.application.log_level = val;
    }

    // Server overrides
    if let Some(val) = env_override("VEIL_SERVER_HOST")? {
        config.server.host = val;
    }
    if let Some(val) = env_override("VEIL_SERVER_PORT")? {
        config.server.port = val;
    }
    if let Some(val) = env_override("VEIL_SERVER_REQUEST_TIMEOUT_SECONDS")? {
        config.server.request_timeout_seconds = val;
    }
    if let Some(val) = env_override("VEIL_SERVER_MAX_TEXT_CHARS")? {
        config.server.max_text_chars = val;
    }

    // Analyzer overrides
    if let Some(val) = env_override("VEIL_ANALYZER_DEFAULT_LANGUAGE")? {
        config.analyzer.default_language = val;
    }
    if let Some(val) = env_override("VEIL_ANALYZER_SCORE_THRESHOLD")? {
        config.analyzer.score_threshold = val;
    }
    if let Some(val) = env_override::<String>("VEIL_ANALYZER_ENTITIES")? {
        config.analyzer.entities = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(val) = env_override::<PathBuf>("VEIL_ANALYZER_PATTERN_LIBRARY")? {
        config.analyzer.pattern_library = Some(val);
    }

    // Anonymizer overrides
    if let Ok(val) = std::env::var("VEIL_ANONYMIZER_HASH_KEY") {
        config.anonymizer.hash_key = Some(secret_string(val));
    }
    if let Some(val) = env_override("VEIL_ANONYMIZER_FALLBACK_TO_DEFAULT")? {
        config.anonymizer.fallback_to_default = val;
    }

    // Logging overrides
    if let Some(val) = env_override("VEIL_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("VEIL_LOGGING_LOCAL_PATH")? {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("VEIL_LOGGING_LOCAL_ROTATION")? {
        config.logging.local_rotation = val;
    }
    if let Some(val) = env_override("VEIL_LOGGING_JSON")? {
        config.logging.json = val;
    }

    Ok(())
}
