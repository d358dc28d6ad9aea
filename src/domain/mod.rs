//! Domain models and types for Veil.
//!
//! The domain layer provides:
//! - **Entity types** ([`EntityType`]): the closed set of PII categories
//! - **Spans and operations** ([`EntitySpan`], [`AnonymizationOperation`])
//! - **Responses** ([`AnonymizedText`], [`MaskingResponse`])
//! - **Offset utilities** ([`CharIndex`]) for character/byte conversion
//! - **Error types** ([`VeilError`], [`PipelineError`]) and the [`Result`] alias
//!
//! # Offsets
//!
//! Every public offset is a character offset. Recognizers work on byte
//! ranges internally and convert through [`CharIndex`] before emitting spans:
//!
//! ```rust
//! use veil::domain::CharIndex;
//!
//! let index = CharIndex::new("né à Paris");
//! assert_eq!(index.char_len(), 10);
//! assert_eq!(index.to_byte(5), Some(7));
//! ```

pub mod entity;
pub mod errors;
pub mod response;
pub mod result;
pub mod span;
pub mod text;

pub use entity::EntityType;
pub use errors::{PipelineError, VeilError};
pub use response::{AnonymizationOperation, AnonymizedText, MaskingResponse};
pub use result::Result;
pub use span::EntitySpan;
pub use text::CharIndex;
