//! Substitution strategy configuration

use super::hash::HashOperator;
use super::mask::{MaskOperator, PartialMaskOperator};
use super::redact::{KeepOperator, RedactOperator};
use super::replace::ReplaceOperator;
use super::Operator;
use serde::{Deserialize, Serialize};

/// Substitution strategy for one entity type
///
/// Serialized with a `type` tag, e.g. `{ type = "partial_mask", visible = 4 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Insert `<ENTITY_TYPE>` or a fixed value
    Replace {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_value: Option<String>,
    },
    /// Replace every character
    Mask {
        #[serde(default = "default_masking_char")]
        masking_char: char,
    },
    /// Keep the last `visible` characters
    PartialMask {
        #[serde(default = "default_visible")]
        visible: usize,
        #[serde(default = "default_masking_char")]
        masking_char: char,
        #[serde(default = "default_true")]
        preserve_separators: bool,
    },
    /// Keyed SHA-256 digest
    Hash,
    /// Remove the value
    Redact,
    /// Leave the value untouched
    Keep,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::Replace { new_value: None }
    }
}

impl StrategyConfig {
    /// Strategy name as used in configuration and operation records
    pub fn name(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::Mask { .. } => "mask",
            Self::PartialMask { .. } => "partial_mask",
            Self::Hash => "hash",
            Self::Redact => "redact",
            Self::Keep => "keep",
        }
    }

    /// Build the operator for this strategy
    pub fn build(&self) -> Box<dyn Operator> {
        match self {
            Self::Replace { new_value: None } => Box::new(ReplaceOperator::new()),
            Self::Replace {
                new_value: Some(value),
            } => Box::new(ReplaceOperator::with_value(value.as_str())),
            Self::Mask { masking_char } => Box::new(MaskOperator::new(*masking_char)),
            Self::PartialMask {
                visible,
                masking_char,
                preserve_separators,
            } => Box::new(PartialMaskOperator::new(
                *visible,
                *masking_char,
                *preserve_separators,
            )),
            Self::Hash => Box::new(HashOperator::new()),
            Self::Redact => Box::new(RedactOperator),
            Self::Keep => Box::new(KeepOperator),
        }
    }
}

fn default_masking_char() -> char {
    '*'
}

fn default_visible() -> usize {
    4
}

fn default_true() -> bool {
    true
}
