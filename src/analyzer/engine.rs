//! Analyzer engine

use super::conflicts::resolve_conflicts;
use super::registry::RecognizerRegistry;
use super::DEFAULT_LANGUAGE;
use crate::config::AnalyzerConfig;
use crate::domain::{CharIndex, EntitySpan, EntityType, PipelineError};
use std::collections::HashSet;

/// Runs registered recognizers and returns a conflict-free analysis result
#[derive(Debug)]
pub struct AnalyzerEngine {
    registry: RecognizerRegistry,
    default_language: String,
    score_threshold: f64,
    allow_list: HashSet<String>,
}

impl AnalyzerEngine {
    /// Create an engine over a registry with default settings
    pub fn new(registry: RecognizerRegistry) -> Self {
        Self {
            registry,
            default_language: DEFAULT_LANGUAGE.to_string(),
            score_threshold: 0.0,
            allow_list: HashSet::new(),
        }
    }

    /// Create an engine from the `[analyzer]` configuration section
    pub fn from_config(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        let registry = match &config.pattern_library {
            Some(path) => RecognizerRegistry::from_pattern_file(path)?,
            None => RecognizerRegistry::with_defaults()?,
        };

        Ok(Self::new(registry)
            .with_default_language(&config.default_language)
            .with_score_threshold(config.score_threshold)
            .with_allow_list(&config.allow_list))
    }

    /// Drop spans scoring below `threshold`
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Never report these values (compared case-insensitively)
    pub fn with_allow_list<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow_list = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        self
    }

    /// Language used when a request does not name one
    pub fn with_default_language(mut self, language: &str) -> Self {
        self.default_language = language.trim().to_lowercase();
        self
    }

    /// Default language tag
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Underlying registry
    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Analyze text for the named entity types
    ///
    /// An empty `entities` list means every registered type. Names that are
    /// unknown, or known but without a recognizer, are rejected rather than
    /// skipped.
    pub fn analyze<S: AsRef<str>>(
        &self,
        text: &str,
        language: &str,
        entities: &[S],
    ) -> Result<Vec<EntitySpan>, PipelineError> {
        let mut requested = Vec::with_capacity(entities.len());
        for name in entities {
            let entity: EntityType = name.as_ref().parse()?;
            if !requested.contains(&entity) {
                requested.push(entity);
            }
        }

        self.analyze_types(text, language, &requested)
    }

    /// Analyze text for the given entity types
    pub fn analyze_types(
        &self,
        text: &str,
        language: &str,
        entities: &[EntityType],
    ) -> Result<Vec<EntitySpan>, PipelineError> {
        let language = self.resolve_language(language)?;

        let requested: Vec<EntityType> = if entities.is_empty() {
            self.registry.registered_entities()
        } else {
            if let Some(missing) = entities.iter().find(|e| !self.registry.is_registered(**e)) {
                return Err(PipelineError::UnknownEntityType(missing.label().to_string()));
            }
            entities.to_vec()
        };

        let index = CharIndex::new(text);
        let mut candidates = Vec::new();

        for recognizer in self.registry.recognizers_for(&language, &requested) {
            let found = recognizer.detect(text, &index);
            tracing::trace!(
                recognizer = recognizer.name(),
                candidates = found.len(),
                "Recognizer finished"
            );
            candidates.extend(
                found
                    .into_iter()
                    .filter(|span| requested.contains(&span.entity_type)),
            );
        }

        let raw_count = candidates.len();
        candidates.retain(|span| {
            span.score >= self.score_threshold && !self.is_allowed(text, &index, span)
        });

        let resolved = resolve_conflicts(candidates);

        tracing::debug!(
            language = %language,
            candidates = raw_count,
            detected = resolved.len(),
            "Analysis complete"
        );

        Ok(resolved)
    }

    fn resolve_language(&self, language: &str) -> Result<String, PipelineError> {
        let language = match language.trim() {
            "" => self.default_language.clone(),
            tag => tag.to_lowercase(),
        };

        if self.registry.supports_language(&language) {
            Ok(language)
        } else {
            Err(PipelineError::UnsupportedLanguage(language))
        }
    }

    fn is_allowed(&self, text: &str, index: &CharIndex, span: &EntitySpan) -> bool {
        if self.allow_list.is_empty() {
            return false;
        }

        index
            .byte_range(span.start, span.end)
            .and_then(|range| text.get(range))
            .is_some_and(|value| self.allow_list.contains(&value.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnalyzerEngine {
        AnalyzerEngine::new(RecognizerRegistry::with_defaults().unwrap())
    }

    fn found(spans: &[EntitySpan]) -> Vec<(EntityType, usize, usize)> {
        spans.iter().map(|s| (s.entity_type, s.start, s.end)).collect()
    }

    #[test]
    fn test_person_and_email() {
        let spans = engine()
            .analyze("Contact John Doe at john@example.com", "en", &[] as &[&str])
            .unwrap();
        assert_eq!(
            found(&spans),
            vec![
                (EntityType::Person, 8, 16),
                (EntityType::EmailAddress, 20, 36)
            ]
        );
    }

    #[test]
    fn test_requested_types_only() {
        let spans = engine()
            .analyze("Contact John Doe at john@example.com", "en", &["EMAIL_ADDRESS"])
            .unwrap();
        assert_eq!(found(&spans), vec![(EntityType::EmailAddress, 20, 36)]);
    }

    #[test]
    fn test_structured_identifiers() {
        let text = "SSN 536-22-8726, card 4111 1111 1111 1111, host 10.0.0.12";
        let spans = engine().analyze(text, "en", &[] as &[&str]).unwrap();
        let types: Vec<_> = spans.iter().map(|s| s.entity_type).collect();
        assert_eq!(
            types,
            vec![
                EntityType::NationalId,
                EntityType::CreditCard,
                EntityType::IpAddress
            ]
        );
        assert_eq!(spans[1].score, 1.0);
    }

    #[test]
    fn test_result_is_deterministic() {
        let analyzer = engine();
        let text = "Dr. Maria Lopez moved from Boston to Paris on March 3, 2021. Call 555-123-4567.";
        let first = analyzer.analyze(text, "en", &[] as &[&str]).unwrap();
        for _ in 0..5 {
            assert_eq!(analyzer.analyze(text, "en", &[] as &[&str]).unwrap(), first);
        }
        assert!(first.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_unsupported_language() {
        let err = engine()
            .analyze("Bonjour Marie", "fr", &[] as &[&str])
            .unwrap_err();
        assert_eq!(err, PipelineError::UnsupportedLanguage("fr".to_string()));
    }

    #[test]
    fn test_empty_language_uses_default() {
        let spans = engine()
            .analyze("a@b.io", "", &["EMAIL_ADDRESS"])
            .unwrap();
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_unknown_entity_type() {
        let err = engine()
            .analyze("text", "en", &["PASSPORT"])
            .unwrap_err();
        assert_eq!(err.kind(), "UnknownEntityTypeError");
    }

    #[test]
    fn test_unregistered_entity_type() {
        let mut registry = RecognizerRegistry::new();
        registry.add(crate::analyzer::LocationRecognizer::with_defaults().unwrap());
        let analyzer = AnalyzerEngine::new(registry);
        let err = analyzer.analyze("text", "en", &["PERSON"]).unwrap_err();
        assert_eq!(err, PipelineError::UnknownEntityType("PERSON".to_string()));
    }

    #[test]
    fn test_score_threshold() {
        let analyzer = engine().with_score_threshold(0.7);
        // A lone first name scores 0.6
        let spans = analyzer.analyze("Ask Sarah", "en", &["PERSON"]).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_allow_list() {
        let analyzer = engine().with_allow_list(["support@example.com"]);
        let spans = analyzer
            .analyze("Write to Support@Example.com or bob@example.com", "en", &["EMAIL"])
            .unwrap();
        assert_eq!(found(&spans), vec![(EntityType::EmailAddress, 32, 47)]);
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "Müller schrieb an zoë@example.com";
        let spans = engine().analyze(text, "en", &["EMAIL_ADDRESS"]).unwrap();
        let surface: String = text
            .chars()
            .skip(spans[0].start)
            .take(spans[0].len())
            .collect();
        assert_eq!(surface, "zoë@example.com");
    }
}
