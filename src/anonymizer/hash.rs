//! Keyed SHA-256 pseudonymization

use super::{Operator, OperatorContext};
use crate::domain::EntityType;
use sha2::{Digest, Sha256};

/// Replaces the value with `hex(sha256(key || value))`
///
/// Equal values map to equal digests for as long as the key is the same.
#[derive(Debug, Clone, Default)]
pub struct HashOperator;

impl HashOperator {
    /// Create a hash operator
    pub fn new() -> Self {
        Self
    }
}

impl Operator for HashOperator {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn operate(&self, _entity_type: EntityType, original: &str, ctx: &OperatorContext) -> String {
        let mut hasher = Sha256::new();
        hasher.update(ctx.hash_key());
        hasher.update(original.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }
}
