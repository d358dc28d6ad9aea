//! Replacement operator

use super::{Operator, OperatorContext};
use crate::domain::EntityType;

/// Replaces the value with a fixed string, `<ENTITY_TYPE>` by default
#[derive(Debug, Clone, Default)]
pub struct ReplaceOperator {
    new_value: Option<String>,
}

impl ReplaceOperator {
    /// Operator inserting the entity placeholder
    pub fn new() -> Self {
        Self::default()
    }

    /// Operator inserting a fixed value
    pub fn with_value(new_value: impl Into<String>) -> Self {
        Self {
            new_value: Some(new_value.into()),
        }
    }
}

impl Operator for ReplaceOperator {
    fn name(&self) -> &'static str {
        "replace"
    }

    fn operate(&self, entity_type: EntityType, _original: &str, _ctx: &OperatorContext) -> String {
        match &self.new_value {
            Some(value) => value.clone(),
            None => entity_type.placeholder(),
        }
    }
}
