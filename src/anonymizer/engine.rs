//! Anonymizer engine

use super::strategy::StrategyConfig;
use super::{Operator, OperatorContext};
use crate::config::{AnonymizerConfig, SecretString};
use crate::domain::{
    AnonymizationOperation, AnonymizedText, CharIndex, EntitySpan, EntityType, PipelineError,
};
use anyhow::Context;
use secrecy::ExposeSecret;
use std::collections::HashMap;

/// Applies per-entity substitution strategies to analyzed text
///
/// Strategy lookup for a span: per-call override, then the configured
/// strategy for its entity type, then the default strategy. With no default
/// strategy an unmapped type fails with [`PipelineError::NoStrategy`].
#[derive(Debug)]
pub struct AnonymizerEngine {
    default_strategy: Option<StrategyConfig>,
    strategies: HashMap<EntityType, StrategyConfig>,
    hash_key: Option<SecretString>,
}

impl Default for AnonymizerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnonymizerEngine {
    /// Engine replacing every entity with its `<ENTITY_TYPE>` placeholder
    pub fn new() -> Self {
        Self {
            default_strategy: Some(StrategyConfig::default()),
            strategies: HashMap::new(),
            hash_key: None,
        }
    }

    /// Create an engine from the `[anonymizer]` configuration section
    pub fn from_config(config: &AnonymizerConfig) -> anyhow::Result<Self> {
        let mut engine = Self::new().with_default_strategy(
            config
                .fallback_to_default
                .then(|| config.default_strategy.clone()),
        );

        for (name, strategy) in &config.strategies {
            let entity: EntityType = name
                .parse()
                .with_context(|| format!("Invalid entity type in anonymizer.strategies: {name}"))?;
            engine = engine.with_strategy(entity, strategy.clone());
        }

        if let Some(key) = &config.hash_key {
            engine = engine.with_hash_key(key.clone());
        }

        Ok(engine)
    }

    /// Set the strategy for one entity type
    pub fn with_strategy(mut self, entity: EntityType, strategy: StrategyConfig) -> Self {
        self.strategies.insert(entity, strategy);
        self
    }

    /// Set or clear the fallback strategy
    pub fn with_default_strategy(mut self, strategy: Option<StrategyConfig>) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Require an explicit strategy for every entity type
    pub fn without_default_strategy(self) -> Self {
        self.with_default_strategy(None)
    }

    /// Use a stable key for the hash strategy instead of a per-call salt
    pub fn with_hash_key(mut self, key: SecretString) -> Self {
        self.hash_key = Some(key);
        self
    }

    /// Whether hashed values stay stable across calls
    pub fn has_stable_hash_key(&self) -> bool {
        self.hash_key.is_some()
    }

    /// Strategy that applies to an entity type
    pub fn strategy_for<'a>(
        &'a self,
        entity: EntityType,
        overrides: &'a HashMap<EntityType, StrategyConfig>,
    ) -> Option<&'a StrategyConfig> {
        overrides
            .get(&entity)
            .or_else(|| self.strategies.get(&entity))
            .or(self.default_strategy.as_ref())
    }

    /// Anonymize text with the configured strategies
    pub fn anonymize(
        &self,
        text: &str,
        spans: &[EntitySpan],
    ) -> Result<AnonymizedText, PipelineError> {
        self.anonymize_with(text, spans, &HashMap::new())
    }

    /// Anonymize text with per-call strategy overrides
    ///
    /// Spans must lie within the text and must not overlap. Every span is
    /// validated and every strategy resolved before the text is touched.
    /// Substitution runs in descending start order; the returned operations
    /// are sorted ascending by original start.
    pub fn anonymize_with(
        &self,
        text: &str,
        spans: &[EntitySpan],
        overrides: &HashMap<EntityType, StrategyConfig>,
    ) -> Result<AnonymizedText, PipelineError> {
        let index = CharIndex::new(text);
        let text_len = index.char_len();

        let mut ordered: Vec<&EntitySpan> = spans.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.end.cmp(&a.end)));

        for span in &ordered {
            let reason = if span.start >= span.end {
                Some("empty span")
            } else if span.end > text_len {
                Some("span ends past the end of the text")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(invalid_span(span, text_len, reason));
            }
        }

        // `ordered` is descending, so each span must end before the previous one starts
        for pair in ordered.windows(2) {
            if pair[1].end > pair[0].start {
                return Err(invalid_span(pair[1], text_len, "overlaps another span"));
            }
        }

        let operators = ordered
            .iter()
            .map(|span| {
                self.strategy_for(span.entity_type, overrides)
                    .map(StrategyConfig::build)
                    .ok_or(PipelineError::NoStrategy(span.entity_type))
            })
            .collect::<Result<Vec<Box<dyn Operator>>, _>>()?;

        let ctx = match &self.hash_key {
            Some(key) => OperatorContext::with_key(key.expose_secret().as_bytes()),
            None => OperatorContext::ephemeral(),
        };

        let mut output = text.to_string();
        let mut items = Vec::with_capacity(ordered.len());

        for (span, operator) in ordered.iter().zip(&operators) {
            let range = index.byte_range(span.start, span.end).ok_or_else(|| {
                invalid_span(span, text_len, "span ends past the end of the text")
            })?;

            let replacement = operator.operate(span.entity_type, &text[range.clone()], &ctx);
            output.replace_range(range, &replacement);

            items.push(AnonymizationOperation {
                entity_type: span.entity_type,
                start: span.start,
                end: span.end,
                operator: operator.name(),
                replacement,
            });
        }

        items.reverse();

        Ok(AnonymizedText {
            text: output,
            items,
        })
    }
}

fn invalid_span(span: &EntitySpan, text_len: usize, reason: &'static str) -> PipelineError {
    PipelineError::InvalidSpan {
        start: span.start,
        end: span.end,
        text_len,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn email(start: usize, end: usize) -> EntitySpan {
        EntitySpan::new(EntityType::EmailAddress, start, end, 0.85)
    }

    #[test]
    fn test_length_changing_substitutions() {
        let text = "A@b.com called B@c.com";
        let result = AnonymizerEngine::new()
            .anonymize(text, &[email(0, 7), email(15, 22)])
            .unwrap();

        assert_eq!(result.text, "<EMAIL_ADDRESS> called <EMAIL_ADDRESS>");
        assert_eq!(result.items.len(), 2);
    }

    #[test]
    fn test_operations_sorted_ascending() {
        let text = "A@b.com called B@c.com";
        // Input order deliberately reversed
        let result = AnonymizerEngine::new()
            .anonymize(text, &[email(15, 22), email(0, 7)])
            .unwrap();

        let starts: Vec<_> = result.items.iter().map(|op| op.start).collect();
        assert_eq!(starts, vec![0, 15]);
        assert_eq!(result.items[0].replacement, "<EMAIL_ADDRESS>");
        assert_eq!(result.items[0].operator, "replace");
    }

    #[test]
    fn test_person_and_email_example() {
        let text = "Contact John Doe at john@example.com";
        let spans = vec![
            EntitySpan::new(EntityType::Person, 8, 16, 0.85),
            EntitySpan::new(EntityType::EmailAddress, 20, 36, 1.0),
        ];
        let result = AnonymizerEngine::new().anonymize(text, &spans).unwrap();
        assert_eq!(result.text, "Contact <PERSON> at <EMAIL_ADDRESS>");
    }

    #[test]
    fn test_span_past_end_is_rejected() {
        let err = AnonymizerEngine::new()
            .anonymize("short", &[email(2, 9)])
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidSpan {
                start: 2,
                end: 9,
                text_len: 5,
                reason: "span ends past the end of the text"
            }
        );
    }

    #[test]
    fn test_empty_and_overlapping_spans_are_rejected() {
        let engine = AnonymizerEngine::new();
        let err = engine.anonymize("abcdef", &[email(3, 3)]).unwrap_err();
        assert_eq!(err.kind(), "InvalidSpanError");

        let err = engine
            .anonymize("abcdefghij", &[email(0, 5), email(4, 8)])
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidSpan {
                reason: "overlaps another span",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_strategy_fails_before_substitution() {
        let engine = AnonymizerEngine::new()
            .without_default_strategy()
            .with_strategy(EntityType::EmailAddress, StrategyConfig::Redact);
        let spans = vec![
            EntitySpan::new(EntityType::Person, 0, 4, 0.9),
            email(5, 12),
        ];
        let err = engine.anonymize("Anna a@b.com", &spans).unwrap_err();
        assert_eq!(err, PipelineError::NoStrategy(EntityType::Person));
    }

    #[test]
    fn test_hash_is_stable_within_one_call() {
        let engine =
            AnonymizerEngine::new().with_strategy(EntityType::EmailAddress, StrategyConfig::Hash);
        let text = "x@y.io and x@y.io";
        let result = engine.anonymize(text, &[email(0, 6), email(11, 17)]).unwrap();
        assert_eq!(result.items[0].replacement, result.items[1].replacement);
        assert_eq!(result.items[0].replacement.len(), 64);

        let again = engine.anonymize(text, &[email(0, 6)]).unwrap();
        assert_ne!(again.items[0].replacement, result.items[0].replacement);
    }

    #[test]
    fn test_configured_hash_key_is_stable_across_calls() {
        let engine = AnonymizerEngine::new()
            .with_strategy(EntityType::EmailAddress, StrategyConfig::Hash)
            .with_hash_key(secret_string("pepper".to_string()));
        let first = engine.anonymize("x@y.io", &[email(0, 6)]).unwrap();
        let second = engine.anonymize("x@y.io", &[email(0, 6)]).unwrap();
        assert_eq!(first.text, second.text);
        assert!(engine.has_stable_hash_key());
    }

    #[test]
    fn test_per_call_overrides() {
        let engine = AnonymizerEngine::new();
        let overrides = HashMap::from([(
            EntityType::CreditCard,
            StrategyConfig::PartialMask {
                visible: 4,
                masking_char: '*',
                preserve_separators: true,
            },
        )]);
        let text = "card 4111-1111-1111-1111 ok";
        let spans = vec![EntitySpan::new(EntityType::CreditCard, 5, 24, 1.0)];
        let result = engine.anonymize_with(text, &spans, &overrides).unwrap();
        assert_eq!(result.text, "card ****-****-****-1111 ok");
        assert_eq!(result.items[0].operator, "partial_mask");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Zoë écrit à zoë@exemple.fr, merci";
        let spans = vec![
            EntitySpan::new(EntityType::Person, 0, 3, 0.6),
            EntitySpan::new(EntityType::EmailAddress, 12, 26, 0.85),
        ];
        let result = AnonymizerEngine::new().anonymize(text, &spans).unwrap();
        assert_eq!(result.text, "<PERSON> écrit à <EMAIL_ADDRESS>, merci");
    }

    #[test]
    fn test_redact_and_keep_still_record_operations() {
        let engine = AnonymizerEngine::new()
            .with_strategy(EntityType::Person, StrategyConfig::Redact)
            .with_strategy(EntityType::Location, StrategyConfig::Keep);
        let spans = vec![
            EntitySpan::new(EntityType::Person, 0, 3, 0.9),
            EntitySpan::new(EntityType::Location, 7, 12, 0.85),
        ];
        let result = engine.anonymize("Ann in Paris", &spans).unwrap();
        assert_eq!(result.text, " in Paris");
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[1].operator, "keep");
    }

    #[test]
    fn test_no_spans() {
        let result = AnonymizerEngine::new().anonymize("nothing here", &[]).unwrap();
        assert_eq!(result.text, "nothing here");
        assert!(result.items.is_empty());
    }
}
