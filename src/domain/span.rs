//! Entity span data model

use super::entity::EntityType;
use serde::{Deserialize, Serialize};

/// A located, typed, scored detection of PII
///
/// `start` and `end` are half-open character offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Category of PII
    pub entity_type: EntityType,
    /// Start offset (inclusive, characters)
    pub start: usize,
    /// End offset (exclusive, characters)
    pub end: usize,
    /// Confidence score (0.0 - 1.0)
    pub score: f64,
    /// Name of the recognizer that produced the span
    #[serde(skip)]
    pub recognizer: String,
}

impl EntitySpan {
    /// Create a new span, clamping the score into `[0.0, 1.0]`
    pub fn new(entity_type: EntityType, start: usize, end: usize, score: f64) -> Self {
        Self {
            entity_type,
            start,
            end,
            score: clamp_score(score),
            recognizer: String::new(),
        }
    }

    /// Attach the producing recognizer's name
    pub fn with_recognizer(mut self, name: impl Into<String>) -> Self {
        self.recognizer = name.into();
        self
    }

    /// Set the confidence score
    pub fn set_score(&mut self, score: f64) {
        self.score = clamp_score(score);
    }

    /// Span length in characters
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no characters
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the two half-open ranges share at least one character
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
