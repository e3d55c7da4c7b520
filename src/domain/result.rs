//! Result type alias for Kiosk Export

use super::errors::KioskError;

/// Result type alias for Kiosk Export operations
///
/// # Examples
///
/// ```
/// use kiosk_export::domain::result::Result;
/// use kiosk_export::domain::errors::KioskError;
///
/// fn failing_function() -> Result<()> {
///     Err(KioskError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, KioskError>;
