//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Optionally set VEIL_HASH_KEY in a .env file for stable hashes");
                println!("  3. Validate configuration: veil validate-config");
                println!("  4. Start the service: veil serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Veil Configuration File
# PII detection and masking service

[application]
log_level = "info"

[server]
host = "127.0.0.1"
port = 5000
request_timeout_seconds = 10
max_text_chars = 100000

[analyzer]
default_language = "en"
score_threshold = 0.0
entities = [
    "PERSON",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "CREDIT_CARD",
    "LOCATION",
    "DATE_TIME",
    "NATIONAL_ID",
    "IP_ADDRESS",
]

[anonymizer]
fallback_to_default = true

[anonymizer.default_strategy]
type = "replace"

[logging]
local_enabled = false
local_path = "/var/log/veil"
local_rotation = "daily"
json = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Veil Configuration File
# PII detection and masking service
#
# This file contains all configuration options with examples and explanations.
# Every setting has a default; any of them can also be overridden with a
# VEIL_<SECTION>_<KEY> environment variable, e.g. VEIL_SERVER_PORT=8080.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
log_level = "info"

# ============================================================================
# HTTP Server
# ============================================================================
[server]
# Bind address and port
host = "127.0.0.1"
port = 5000

# Requests running longer than this are aborted (1-300)
request_timeout_seconds = 10

# Longest accepted text, in characters
max_text_chars = 100000

# ============================================================================
# Analyzer
# ============================================================================
[analyzer]
# Language used when a request does not name one
default_language = "en"

# Detections scoring below this are dropped (0.0-1.0)
score_threshold = 0.0

# Entity types detected when a request does not name any
entities = [
    "PERSON",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "CREDIT_CARD",
    "LOCATION",
    "DATE_TIME",
    "NATIONAL_ID",
    "IP_ADDRESS",
]

# Values that are never reported, compared case-insensitively
allow_list = []

# Optional: replace the built-in pattern library
# pattern_library = "patterns/default_patterns.toml"

# ============================================================================
# Anonymizer
# ============================================================================
[anonymizer]
# Use default_strategy for entity types without their own entry.
# When false, every entity type in analyzer.entities needs a strategy.
fallback_to_default = true

# Optional: stable key for the hash strategy (use an environment variable).
# Without it, hashes are salted per request.
# hash_key = "${VEIL_HASH_KEY}"

# Strategy types:
#   replace       - <ENTITY_TYPE> placeholder, or new_value
#   mask          - every character replaced by masking_char
#   partial_mask  - keep the last `visible` characters
#   hash          - SHA-256 hex digest
#   redact        - remove the value
#   keep          - leave the value untouched
[anonymizer.default_strategy]
type = "replace"

[anonymizer.strategies.CREDIT_CARD]
type = "partial_mask"
visible = 4
masking_char = "*"
preserve_separators = true

[anonymizer.strategies.EMAIL_ADDRESS]
type = "hash"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "/var/log/veil"

# Log rotation (daily, hourly, never)
local_rotation = "daily"

# Console output as JSON lines
json = false
"#
        .to_string()
    }
}
