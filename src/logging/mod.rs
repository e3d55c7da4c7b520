//! Logging and observability
//!
//! Structured logging with:
//! - JSON-formatted file logs with rotation
//! - Human-readable console output
//! - Configurable log levels (`RUST_LOG` wins over the configured level)
//!
//! # Example
//!
//! ```no_run
//! use kiosk_export::logging::init_logging;
//! use kiosk_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(category = "fetch", "Harvest started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of processing for one object record
///
/// # Example
///
/// ```no_run
/// use kiosk_export::log_record_start;
/// use kiosk_export::domain::ObjectId;
///
/// let object_id = ObjectId::new("1976.057.001").unwrap();
/// log_record_start!("json", &object_id);
/// ```
#[macro_export]
macro_rules! log_record_start {
    ($format:expr, $object_id:expr) => {
        tracing::debug!(
            category = "split",
            format = $format,
            object_id = %$object_id,
            "Processing record"
        );
    };
}

/// Log a required field that resolved to nothing
///
/// # Example
///
/// ```no_run
/// use kiosk_export::log_missing_field;
///
/// log_missing_field!("1976.057.001", "Title", "title");
/// ```
#[macro_export]
macro_rules! log_missing_field {
    ($object_id:expr, $name:expr, $path:expr) => {
        tracing::warn!(
            category = "missing_field",
            object_id = %$object_id,
            field = %$name,
            path = %$path,
            "Required field missing"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use kiosk_export::log_error_with_context;
/// use kiosk_export::domain::KioskError;
///
/// let error = KioskError::Configuration("Invalid config".to_string());
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

#[cfg(test)]
mod tests {
    use crate::domain::{KioskError, ObjectId};

    #[test]
    fn test_macros_expand_without_subscriber() {
        let object_id = ObjectId::new("obj1").unwrap();
        crate::log_record_start!("xml", &object_id);
        crate::log_missing_field!(&object_id, "Title", "title");
        let error = KioskError::Other("boom".to_string());
        crate::log_error_with_context!(&error, "test");
    }
}
