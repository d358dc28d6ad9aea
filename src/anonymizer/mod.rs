//! Anonymizer: substitution of detected spans
//!
//! Each entity type maps to a [`StrategyConfig`], which builds an
//! [`Operator`] producing the replacement string for one span. The
//! [`AnonymizerEngine`] validates spans, resolves a strategy for each one and
//! splices replacements into the text in descending start order.
//!
//! # Example
//!
//! ```rust
//! use veil::anonymizer::AnonymizerEngine;
//! use veil::domain::{EntitySpan, EntityType};
//!
//! let text = "A@b.com called B@c.com";
//! let spans = vec![
//!     EntitySpan::new(EntityType::EmailAddress, 0, 7, 0.85),
//!     EntitySpan::new(EntityType::EmailAddress, 15, 22, 0.85),
//! ];
//!
//! let result = AnonymizerEngine::new().anonymize(text, &spans)?;
//! assert_eq!(result.text, "<EMAIL_ADDRESS> called <EMAIL_ADDRESS>");
//! # Ok::<(), veil::domain::PipelineError>(())
//! ```

pub mod engine;
pub mod hash;
pub mod mask;
pub mod redact;
pub mod replace;
pub mod strategy;

use crate::domain::EntityType;
use rand::RngCore;
use zeroize::Zeroizing;

pub use engine::AnonymizerEngine;
pub use hash::HashOperator;
pub use mask::{MaskOperator, PartialMaskOperator};
pub use redact::{KeepOperator, RedactOperator};
pub use replace::ReplaceOperator;
pub use strategy::StrategyConfig;

/// Trait for substitution operators
pub trait Operator: Send + Sync {
    /// Strategy name recorded on each operation
    fn name(&self) -> &'static str;

    /// Produce the replacement for one detected value
    fn operate(&self, entity_type: EntityType, original: &str, ctx: &OperatorContext) -> String;
}

/// Per-call state shared by every operator of one anonymization
pub struct OperatorContext {
    hash_key: Zeroizing<Vec<u8>>,
}

impl OperatorContext {
    /// Length of a generated hash key in bytes
    pub const KEY_LEN: usize = 32;

    /// Context with a random key, valid for a single call
    pub fn ephemeral() -> Self {
        let mut key = vec![0u8; Self::KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self {
            hash_key: Zeroizing::new(key),
        }
    }

    /// Context with a caller-supplied key
    pub fn with_key(key: &[u8]) -> Self {
        Self {
            hash_key: Zeroizing::new(key.to_vec()),
        }
    }

    /// Key mixed into hashed values
    pub fn hash_key(&self) -> &[u8] {
        &self.hash_key
    }
}

impl std::fmt::Debug for OperatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorContext")
            .field("hash_key", &"[REDACTED]")
            .finish()
    }
}
