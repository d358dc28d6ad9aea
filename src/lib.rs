// Veil - PII masking service
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - PII detection and masking
//!
//! Veil takes free text, detects personally identifiable information in it
//! and returns the detected entities together with a masked copy of the text.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Recognizing** PII with deterministic recognizers (regex patterns with
//!   checksum validators, context words, name and place gazetteers)
//! - **Resolving** overlapping detections into a conflict-free span list
//! - **Anonymizing** each span with a per-entity strategy (replace, mask,
//!   partial mask, hash, redact, keep)
//! - **Serving** the pipeline over HTTP
//!
//! ## Architecture
//!
//! - [`analyzer`] - Recognizer registry and analyzer engine
//! - [`anonymizer`] - Substitution strategies and anonymizer engine
//! - [`pipeline`] - Analyzer and anonymizer wired together
//! - [`server`] - HTTP service (axum)
//! - [`cli`] - Command-line interface and argument parsing
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use veil::config::VeilConfig;
//! use veil::pipeline::MaskingPipeline;
//!
//! # fn main() -> anyhow::Result<()> {
//! let pipeline = MaskingPipeline::from_config(&VeilConfig::default())?;
//! let response = pipeline.mask_text("Contact John Doe at john@example.com")?;
//!
//! assert_eq!(response.anonymized_text, "Contact <PERSON> at <EMAIL_ADDRESS>");
//! for entity in &response.detected_entities {
//!     println!("{} [{}, {}) {:.2}", entity.entity_type, entity.start, entity.end, entity.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Offsets
//!
//! Every `start`/`end` in the public API counts Unicode scalar values
//! (characters), not bytes, so offsets are stable for multi-byte text.
//!
//! ## Privacy
//!
//! Submitted text is never logged, persisted or echoed in error messages.
//! Log events carry entity counts, offsets and timings only.

pub mod analyzer;
pub mod anonymizer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod pipeline;
pub mod server;
