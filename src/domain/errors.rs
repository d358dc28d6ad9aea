//! Domain error types
//!
//! Two layers: [`PipelineError`] covers caller-input and configuration faults
//! raised by the analyzer and anonymizer, [`VeilError`] is the application
//! error that wraps it alongside configuration, I/O and server failures.
//!
//! No variant carries the text being analyzed. Offsets and entity labels are
//! safe to report, the submitted text is not.

use super::entity::EntityType;
use thiserror::Error;

/// Errors raised by the masking pipeline
///
/// All variants are recoverable by fixing the request or the configuration;
/// none of them is transient, so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// No recognizer is registered for the requested language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Requested entity type is not known or has no registered recognizer
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Span outside the text bounds, empty, or overlapping another span
    #[error("Invalid span [{start}, {end}) for text of {text_len} characters: {reason}")]
    InvalidSpan {
        start: usize,
        end: usize,
        text_len: usize,
        reason: &'static str,
    },

    /// No substitution strategy configured for an entity type
    #[error("No anonymization strategy configured for entity type {0}")]
    NoStrategy(EntityType),
}

impl PipelineError {
    /// Stable error kind reported to callers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "UnsupportedLanguageError",
            Self::UnknownEntityType(_) => "UnknownEntityTypeError",
            Self::InvalidSpan { .. } => "InvalidSpanError",
            Self::NoStrategy(_) => "NoStrategyError",
        }
    }

    /// Whether the fault lies in the request rather than in server configuration
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage(_) | Self::UnknownEntityType(_)
        )
    }
}

/// Main Veil error type
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Analyzer or anonymizer failures
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veil_error_display() {
        let err = VeilError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_pipeline_error_kinds() {
        assert_eq!(
            PipelineError::UnsupportedLanguage("fr".into()).kind(),
            "UnsupportedLanguageError"
        );
        assert_eq!(
            PipelineError::UnknownEntityType("X".into()).kind(),
            "UnknownEntityTypeError"
        );
        assert_eq!(
            PipelineError::InvalidSpan {
                start: 3,
                end: 1,
                text_len: 2,
                reason: "empty"
            }
            .kind(),
            "InvalidSpanError"
        );
        assert_eq!(
            PipelineError::NoStrategy(EntityType::Person).kind(),
            "NoStrategyError"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PipelineError::UnsupportedLanguage("de".into()).is_client_error());
        assert!(!PipelineError::NoStrategy(EntityType::Location).is_client_error());
    }

    #[test]
    fn test_pipeline_error_conversion() {
        let err: VeilError = PipelineError::UnsupportedLanguage("fr".into()).into();
        assert!(matches!(err, VeilError::Pipeline(_)));
        assert_eq!(err.to_string(), "Pipeline error: Unsupported language: fr");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: VeilError = io_err.into();
        assert!(matches!(err, VeilError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: VeilError = json_err.into();
        assert!(matches!(err, VeilError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: VeilError = toml_err.into();
        assert!(matches!(err, VeilError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_veil_error_implements_std_error() {
        let err = VeilError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
