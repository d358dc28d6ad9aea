//! Recognizer registry and analyzer
//!
//! Detection runs in three steps:
//! - **Recognizers** each scan the full text independently and emit candidate
//!   [`EntitySpan`]s for the entity types they declare
//! - **Filtering** drops spans below the score threshold and allow-listed values
//! - **Conflict resolution** removes overlapping spans so the anonymizer
//!   receives a conflict-free, start-ordered result
//!
//! # Usage
//!
//! ```rust
//! use veil::analyzer::{AnalyzerEngine, RecognizerRegistry};
//!
//! let registry = RecognizerRegistry::with_defaults()?;
//! let analyzer = AnalyzerEngine::new(registry);
//!
//! let spans = analyzer.analyze("Mail me at jane@example.com", "en", &["EMAIL_ADDRESS"])?;
//! assert_eq!(spans.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod conflicts;
pub mod context;
pub mod engine;
pub mod gazetteer;
pub mod pattern;
pub mod patterns;
pub mod registry;
pub mod validators;

use crate::domain::{CharIndex, EntitySpan, EntityType};

pub use conflicts::resolve_conflicts;
pub use context::ContextEnhancer;
pub use engine::AnalyzerEngine;
pub use gazetteer::{LocationRecognizer, PersonRecognizer};
pub use pattern::PatternRecognizer;
pub use patterns::PatternLibrary;
pub use registry::RecognizerRegistry;
pub use validators::Validator;

/// Language tag of the built-in recognizers
pub const DEFAULT_LANGUAGE: &str = "en";

/// Trait for entity recognizers
///
/// Implementations hold only read-only state built at start-up, so a single
/// instance is shared by every request.
pub trait Recognizer: Send + Sync {
    /// Name used in logs and for deterministic tie-breaking
    fn name(&self) -> &str;

    /// Entity types this recognizer can emit
    fn supported_entities(&self) -> &[EntityType];

    /// Language tag this recognizer handles
    fn supported_language(&self) -> &str {
        DEFAULT_LANGUAGE
    }

    /// Detect candidate spans over the full text
    ///
    /// `index` is the offset map of `text`; spans must use character offsets.
    fn detect(&self, text: &str, index: &CharIndex) -> Vec<EntitySpan>;
}
