//! Removal and pass-through operators

use super::{Operator, OperatorContext};
use crate::domain::EntityType;

/// Removes the value entirely
#[derive(Debug, Clone, Default)]
pub struct RedactOperator;

impl Operator for RedactOperator {
    fn name(&self) -> &'static str {
        "redact"
    }

    fn operate(&self, _entity_type: EntityType, _original: &str, _ctx: &OperatorContext) -> String {
        String::new()
    }
}

/// Leaves the value in place; the operation is still recorded
#[derive(Debug, Clone, Default)]
pub struct KeepOperator;

impl Operator for KeepOperator {
    fn name(&self) -> &'static str {
        "keep"
    }

    fn operate(&self, _entity_type: EntityType, original: &str, _ctx: &OperatorContext) -> String {
        original.to_string()
    }
}
