//! Result type alias for Veil

use super::errors::VeilError;

/// Result type alias for Veil operations
///
/// # Examples
///
/// ```
/// use veil::domain::result::Result;
/// use veil::domain::errors::VeilError;
///
/// fn failing_function() -> Result<()> {
///     Err(VeilError::Validation("No text provided".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VeilError>;
