//! Character masking operators

use super::{Operator, OperatorContext};
use crate::domain::EntityType;

/// Replaces every character with the masking character
#[derive(Debug, Clone)]
pub struct MaskOperator {
    masking_char: char,
}

impl MaskOperator {
    /// Create a mask operator
    pub fn new(masking_char: char) -> Self {
        Self { masking_char }
    }
}

impl Operator for MaskOperator {
    fn name(&self) -> &'static str {
        "mask"
    }

    fn operate(&self, _entity_type: EntityType, original: &str, _ctx: &OperatorContext) -> String {
        original.chars().map(|_| self.masking_char).collect()
    }
}

/// Masks all but the last `visible` characters
///
/// With `preserve_separators`, only alphanumeric characters are masked or
/// counted, so formatting such as dashes and spaces survives. A value with no
/// more than `visible` maskable characters is masked completely.
#[derive(Debug, Clone)]
pub struct PartialMaskOperator {
    visible: usize,
    masking_char: char,
    preserve_separators: bool,
}

impl PartialMaskOperator {
    /// Create a partial mask operator
    pub fn new(visible: usize, masking_char: char, preserve_separators: bool) -> Self {
        Self {
            visible,
            masking_char,
            preserve_separators,
        }
    }

    fn is_maskable(&self, c: char) -> bool {
        !self.preserve_separators || c.is_alphanumeric()
    }
}

impl Operator for PartialMaskOperator {
    fn name(&self) -> &'static str {
        "partial_mask"
    }

    fn operate(&self, _entity_type: EntityType, original: &str, _ctx: &OperatorContext) -> String {
        let maskable = original.chars().filter(|c| self.is_maskable(*c)).count();
        let to_mask = if maskable > self.visible {
            maskable - self.visible
        } else {
            maskable
        };

        let mut masked = 0;
        original
            .chars()
            .map(|c| {
                if masked < to_mask && self.is_maskable(c) {
                    masked += 1;
                    self.masking_char
                } else {
                    c
                }
            })
            .collect()
    }
}
