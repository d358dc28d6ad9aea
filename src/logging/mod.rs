//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Plain or JSON console output
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! Submitted text never appears in log events. Request events carry entity
//! counts, offsets and timings only.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one masking request
///
/// # Example
///
/// ```no_run
/// use veil::log_mask_complete;
/// use std::time::Duration;
///
/// log_mask_complete!("en", 3, "PERSON=2 EMAIL_ADDRESS=1", Duration::from_millis(4));
/// ```
#[macro_export]
macro_rules! log_mask_complete {
    ($language:expr, $detected:expr, $counts:expr, $duration:expr) => {
        tracing::info!(
            language = %$language,
            detected = $detected,
            entities = %$counts,
            duration_ms = $duration.as_millis() as u64,
            "Masking request completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
