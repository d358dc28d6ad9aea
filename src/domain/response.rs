//! Anonymization operations and the per-request masking response

use super::entity::EntityType;
use super::span::EntitySpan;
use serde::Serialize;
use std::collections::BTreeMap;

/// One substitution applied to the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymizationOperation {
    /// Category of the replaced span
    pub entity_type: EntityType,
    /// Start offset in the original text (characters)
    pub start: usize,
    /// End offset in the original text (characters)
    pub end: usize,
    /// Strategy that produced the replacement
    pub operator: &'static str,
    /// String actually inserted
    pub replacement: String,
}

/// Anonymizer output
///
/// `items` is sorted ascending by original `start`, regardless of the
/// descending order in which substitutions were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymizedText {
    /// Text after every substitution
    pub text: String,
    /// Substitutions applied
    pub items: Vec<AnonymizationOperation>,
}

/// Result of masking one request
///
/// Holds the submitted text only for the lifetime of the response; nothing
/// is retained after it is serialized.
#[derive(Debug, Clone, Serialize)]
pub struct MaskingResponse {
    /// Text as submitted
    pub original_text: String,
    /// Text with every detected entity substituted
    pub anonymized_text: String,
    /// Conflict-free detections sorted by `start`
    pub detected_entities: Vec<EntitySpan>,
    /// Substitutions sorted by original `start`
    pub operations: Vec<AnonymizationOperation>,
}

impl MaskingResponse {
    /// Assemble a response from analyzer and anonymizer output
    pub fn new(original_text: String, spans: Vec<EntitySpan>, anonymized: AnonymizedText) -> Self {
        Self {
            original_text,
            anonymized_text: anonymized.text,
            detected_entities: spans,
            operations: anonymized.items,
        }
    }

    /// Detection counts per entity type
    pub fn counts_by_type(&self) -> BTreeMap<EntityType, usize> {
        let mut counts = BTreeMap::new();
        for span in &self.detected_entities {
            *counts.entry(span.entity_type).or_insert(0) += 1;
        }
        counts
    }

    /// Check if any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.detected_entities.is_empty()
    }
}
