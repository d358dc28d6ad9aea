//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::config::load_config;
use crate::pipeline::MaskingPipeline;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also applies env overrides and validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        // Compiles the pattern library and checks entity coverage
        let pipeline = match MaskingPipeline::from_config(&config) {
            Ok(p) => {
                println!("✅ Configuration is valid");
                p
            }
            Err(e) => {
                println!("❌ Failed to build masking pipeline");
                println!("   Error: {e:#}");
                println!();
                return Ok(2);
            }
        };

        let registry = pipeline.analyzer().registry();
        let entities: Vec<&str> = pipeline
            .default_entities()
            .iter()
            .map(|entity| entity.label())
            .collect();

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!(
            "  Request Timeout: {}s",
            config.server.request_timeout_seconds
        );
        println!("  Max Text Length: {} chars", config.server.max_text_chars);
        println!("  Default Language: {}", config.analyzer.default_language);
        println!("  Score Threshold: {}", config.analyzer.score_threshold);
        println!("  Recognizers: {}", registry.len());
        println!("  Default Entities: {}", entities.join(", "));
        println!(
            "  Pattern Library: {}",
            config
                .analyzer
                .pattern_library
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!(
            "  Default Strategy: {}",
            config.anonymizer.default_strategy.name()
        );
        println!(
            "  Strategy Overrides: {}",
            config.anonymizer.strategies.len()
        );
        println!(
            "  Stable Hash Key: {}",
            if config.anonymizer.hash_key.is_some() {
                "configured"
            } else {
                "per request"
            }
        );
        println!();
        Ok(0)
    }
}
