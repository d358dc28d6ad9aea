//! Regex-based recognizer

use super::context::ContextEnhancer;
use super::validators::{Validation, Validator};
use super::{Recognizer, DEFAULT_LANGUAGE};
use crate::domain::{CharIndex, EntitySpan, EntityType};
use regex::Regex;

/// Named group that narrows the reported span inside a match
pub const ENTITY_GROUP: &str = "entity";

/// Compiled regex with its base score
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Compiled regex
    pub regex: Regex,
    /// Score assigned to a raw match
    pub score: f64,
}

/// Regex-based recognizer for a single entity type
///
/// A match is reported as the `entity` named group when the regex defines
/// one, otherwise as the whole match. The optional validator runs before
/// context enhancement.
pub struct PatternRecognizer {
    name: String,
    entities: [EntityType; 1],
    language: String,
    patterns: Vec<Pattern>,
    validator: Option<Validator>,
    context: Option<ContextEnhancer>,
}

impl PatternRecognizer {
    /// Create a recognizer with no patterns
    pub fn new(name: impl Into<String>, entity: EntityType) -> Self {
        Self {
            name: name.into(),
            entities: [entity],
            language: DEFAULT_LANGUAGE.to_string(),
            patterns: Vec::new(),
            validator: None,
            context: None,
        }
    }

    /// Add a compiled pattern
    pub fn with_pattern(mut self, regex: Regex, score: f64) -> Self {
        self.patterns.push(Pattern {
            regex,
            score: score.clamp(0.0, 1.0),
        });
        self
    }

    /// Attach a validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach context words
    pub fn with_context(mut self, context: ContextEnhancer) -> Self {
        self.context = (!context.is_empty()).then_some(context);
        self
    }

    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into().to_lowercase();
        self
    }

    /// Entity type emitted by this recognizer
    pub fn entity(&self) -> EntityType {
        self.entities[0]
    }

    /// Compiled patterns
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_entities(&self) -> &[EntityType] {
        &self.entities
    }

    fn supported_language(&self) -> &str {
        &self.language
    }

    fn detect(&self, text: &str, index: &CharIndex) -> Vec<EntitySpan> {
        let mut spans: Vec<EntitySpan> = Vec::new();

        for pattern in &self.patterns {
            for capture in pattern.regex.captures_iter(text) {
                let Some(matched) = capture.name(ENTITY_GROUP).or_else(|| capture.get(0)) else {
                    continue;
                };
                if matched.is_empty() {
                    continue;
                }

                let mut score = pattern.score;
                if let Some(validator) = self.validator {
                    match validator.validate(matched.as_str()) {
                        Validation::Invalid => continue,
                        Validation::Certain => score = 1.0,
                        Validation::Plausible => {}
                    }
                }
                if let Some(ref context) = self.context {
                    score = context.enhance(text, matched.start(), score);
                }

                let Some(range) = index.char_range(matched.range()) else {
                    continue;
                };

                // Two patterns of one recognizer can hit the same range
                if let Some(existing) = spans
                    .iter_mut()
                    .find(|s| s.start == range.start && s.end == range.end)
                {
                    if score > existing.score {
                        existing.set_score(score);
                    }
                    continue;
                }

                spans.push(
                    EntitySpan::new(self.entity(), range.start, range.end, score)
                        .with_recognizer(self.name.as_str()),
                );
            }
        }

        spans
    }
}
