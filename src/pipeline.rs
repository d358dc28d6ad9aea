//! Masking pipeline: analyzer followed by anonymizer
//!
//! One [`MaskingPipeline`] is built at start-up and shared read-only by all
//! requests. Each call to [`MaskingPipeline::mask`] is independent.

use crate::analyzer::AnalyzerEngine;
use crate::anonymizer::{AnonymizerEngine, StrategyConfig};
use crate::config::VeilConfig;
use crate::domain::{EntityType, MaskingResponse, PipelineError, VeilError};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;

/// Message returned when a request carries no text
pub const NO_TEXT_MESSAGE: &str = "No text provided";

/// One masking request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaskRequest {
    /// Text to analyze and anonymize
    #[serde(default)]
    pub text: String,

    /// Language tag; the analyzer default when absent
    #[serde(default)]
    pub language: Option<String>,

    /// Entity types to detect; the configured defaults when empty
    #[serde(default)]
    pub entities: Vec<String>,

    /// Per-request strategy overrides keyed by entity type label
    #[serde(default)]
    pub strategies: HashMap<String, StrategyConfig>,
}

impl MaskRequest {
    /// Request for `text` with default language, entities and strategies
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Restrict detection to the named entity types
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    /// Override the strategy for one entity type
    pub fn with_strategy(mut self, entity: EntityType, strategy: StrategyConfig) -> Self {
        self.strategies.insert(entity.label().to_string(), strategy);
        self
    }

    /// Reject requests that must never reach the pipeline
    ///
    /// Empty or whitespace-only text and text longer than `max_chars`
    /// characters are rejected.
    pub fn validate(&self, max_chars: usize) -> Result<(), VeilError> {
        if self.text.trim().is_empty() {
            return Err(VeilError::Validation(NO_TEXT_MESSAGE.to_string()));
        }

        let chars = self.text.chars().count();
        if chars > max_chars {
            return Err(VeilError::Validation(format!(
                "Text is {chars} characters long, the maximum is {max_chars}"
            )));
        }

        Ok(())
    }
}

/// Analyzer and anonymizer wired together
#[derive(Debug)]
pub struct MaskingPipeline {
    analyzer: AnalyzerEngine,
    anonymizer: AnonymizerEngine,
    default_entities: Vec<EntityType>,
}

impl MaskingPipeline {
    /// Create a pipeline analyzing every registered entity type by default
    pub fn new(analyzer: AnalyzerEngine, anonymizer: AnonymizerEngine) -> Self {
        Self {
            analyzer,
            anonymizer,
            default_entities: Vec::new(),
        }
    }

    /// Build the pipeline from configuration
    ///
    /// Fails when a configured default entity type has no recognizer, so a
    /// misconfiguration surfaces at start-up rather than on every request.
    pub fn from_config(config: &VeilConfig) -> anyhow::Result<Self> {
        let analyzer = AnalyzerEngine::from_config(&config.analyzer)
            .context("Failed to build analyzer")?;
        let anonymizer = AnonymizerEngine::from_config(&config.anonymizer)
            .context("Failed to build anonymizer")?;

        let default_entities = config
            .analyzer
            .entity_types()
            .map_err(anyhow::Error::msg)?;

        if let Some(missing) = default_entities
            .iter()
            .find(|entity| !analyzer.registry().is_registered(**entity))
        {
            anyhow::bail!("No recognizer registered for configured entity type {missing}");
        }

        tracing::info!(
            recognizers = analyzer.registry().len(),
            default_entities = default_entities.len(),
            stable_hash_key = anonymizer.has_stable_hash_key(),
            "Masking pipeline ready"
        );

        Ok(Self {
            analyzer,
            anonymizer,
            default_entities,
        })
    }

    /// Restrict the entity types analyzed when a request names none
    pub fn with_default_entities(mut self, entities: Vec<EntityType>) -> Self {
        self.default_entities = entities;
        self
    }

    /// The analyzer
    pub fn analyzer(&self) -> &AnalyzerEngine {
        &self.analyzer
    }

    /// The anonymizer
    pub fn anonymizer(&self) -> &AnonymizerEngine {
        &self.anonymizer
    }

    /// Entity types analyzed by default
    pub fn default_entities(&self) -> Vec<EntityType> {
        if self.default_entities.is_empty() {
            self.analyzer.registry().registered_entities()
        } else {
            self.default_entities.clone()
        }
    }

    /// Mask a text with default language, entities and strategies
    pub fn mask_text(&self, text: &str) -> Result<MaskingResponse, PipelineError> {
        self.mask(&MaskRequest::new(text))
    }

    /// Analyze and anonymize one request
    ///
    /// The request is expected to have passed [`MaskRequest::validate`].
    pub fn mask(&self, request: &MaskRequest) -> Result<MaskingResponse, PipelineError> {
        let started = Instant::now();

        let language = request
            .language
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .unwrap_or(self.analyzer.default_language());

        let spans = if request.entities.is_empty() {
            self.analyzer
                .analyze_types(&request.text, language, &self.default_entities)?
        } else {
            self.analyzer
                .analyze(&request.text, language, &request.entities)?
        };

        let overrides = request
            .strategies
            .iter()
            .map(|(name, strategy)| {
                let entity: EntityType = name.parse()?;
                Ok((entity, strategy.clone()))
            })
            .collect::<Result<HashMap<_, _>, PipelineError>>()?;

        let anonymized = self
            .anonymizer
            .anonymize_with(&request.text, &spans, &overrides)?;

        let response = MaskingResponse::new(request.text.clone(), spans, anonymized);

        let counts = response
            .counts_by_type()
            .iter()
            .map(|(entity, count)| format!("{entity}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        crate::log_mask_complete!(
            language,
            response.detected_entities.len(),
            counts,
            started.elapsed()
        );

        Ok(response)
    }
}
