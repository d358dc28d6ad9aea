//! Pattern library for regex recognizers

use super::context::ContextEnhancer;
use super::pattern::PatternRecognizer;
use super::validators::Validator;
use super::DEFAULT_LANGUAGE;
use crate::domain::EntityType;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Entity type label
    pub entity: String,
    /// Score for a raw match (0.0 - 1.0)
    pub score: f64,
    /// Regex patterns for this entity
    pub patterns: Vec<String>,
    /// Optional validator name
    #[serde(default)]
    pub validator: Option<String>,
    /// Context words raising the score
    #[serde(default)]
    pub context: Vec<String>,
    /// Language tag
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Pattern library container
///
/// Definitions are kept in name order so recognizers are registered
/// deterministically.
#[derive(Debug, Deserialize)]
pub struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

impl PatternLibrary {
    /// Load a pattern library from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Parse a pattern library from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse pattern library TOML")
    }

    /// The built-in pattern library
    pub fn default_library() -> Result<Self> {
        let default_toml = include_str!("../../patterns/default_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Number of pattern definitions
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the library defines no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Compile every definition into a recognizer
    pub fn compile(&self) -> Result<Vec<PatternRecognizer>> {
        self.patterns
            .iter()
            .map(|(name, def)| Self::compile_definition(name, def))
            .collect()
    }

    fn compile_definition(name: &str, def: &PatternDefinition) -> Result<PatternRecognizer> {
        let entity: EntityType = def
            .entity
            .parse()
            .with_context(|| format!("Invalid entity in pattern '{name}': {}", def.entity))?;

        if !(0.0..=1.0).contains(&def.score) {
            anyhow::bail!("Score for pattern '{name}' must be within 0.0 - 1.0");
        }
        if def.patterns.is_empty() {
            anyhow::bail!("Pattern '{name}' defines no regexes");
        }

        let mut recognizer = PatternRecognizer::new(name, entity).with_language(&def.language);

        for pattern_str in &def.patterns {
            let regex = Regex::new(pattern_str)
                .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;
            recognizer = recognizer.with_pattern(regex, def.score);
        }

        if let Some(ref validator) = def.validator {
            let validator = Validator::parse(validator)
                .with_context(|| format!("Invalid validator in pattern '{name}'"))?;
            recognizer = recognizer.with_validator(validator);
        }

        if !def.context.is_empty() {
            recognizer = recognizer.with_context(ContextEnhancer::new(&def.context));
        }

        Ok(recognizer)
    }
}
