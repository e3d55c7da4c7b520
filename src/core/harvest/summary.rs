//! Harvest summary and reporting
//!
//! This module defines structures for tracking and reporting harvest results.

use crate::core::validate::MissingFieldReport;
use crate::domain::{ObjectId, RecordFormat};
use std::fmt;
use std::time::Duration;

/// Summary of a harvest run
#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
    /// Records yielded by the splitters
    pub records_seen: usize,

    /// Records that went through every enabled step
    pub records_processed: usize,

    /// Records abandoned after an error
    pub records_failed: usize,

    /// Records with at least one missing required field
    pub records_with_missing_fields: usize,

    /// Remote files created in the document store
    pub files_created: usize,

    /// Remote files updated in place
    pub files_updated: usize,

    /// Copies written to object storage
    pub objects_copied: usize,

    /// Digital assets referenced by JSON records
    pub digital_assets: usize,

    /// Whether the missing-field email went out
    pub notification_sent: bool,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<HarvestError>,

    /// Missing-field report across both passes
    pub report: MissingFieldReport,
}

impl HarvestSummary {
    /// Create a new empty harvest summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: HarvestError) {
        self.errors.push(error);
    }

    /// Check if the run was successful (no failed records, no errors)
    pub fn is_successful(&self) -> bool {
        self.records_failed == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            records_seen = self.records_seen,
            processed = self.records_processed,
            failed = self.records_failed,
            missing_fields = self.records_with_missing_fields,
            files_created = self.files_created,
            files_updated = self.files_updated,
            objects_copied = self.objects_copied,
            digital_assets = self.digital_assets,
            notification_sent = self.notification_sent,
            duration_secs = self.duration.as_secs(),
            "Harvest completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Harvest completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    category = error.error_type.category(),
                    object_id = error.object_id.as_ref().map(ObjectId::as_str),
                    message = %error.message,
                    "Harvest error"
                );
            }
        }
    }
}

/// Type of harvest error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestErrorType {
    /// The composite document could not be retrieved
    Fetch,
    /// The composite file vanished before splitting
    SourceFileMissing,
    /// Malformed composite document or unresolvable record identifier
    Parse,
    /// Writing a local artifact failed
    LocalIo,
    /// Remote document store create/update failed
    Upsert,
    /// Object storage copy failed
    SecondaryStorage,
    /// Missing-field email could not be delivered
    Notification,
    /// Invalid runtime configuration
    Configuration,
}

impl HarvestErrorType {
    /// Log category of the error
    pub fn category(&self) -> &'static str {
        match self {
            HarvestErrorType::Fetch => "fetch",
            HarvestErrorType::SourceFileMissing => "source_file_missing",
            HarvestErrorType::Parse => "parse",
            HarvestErrorType::LocalIo => "local_io",
            HarvestErrorType::Upsert => "upsert",
            HarvestErrorType::SecondaryStorage => "secondary_storage",
            HarvestErrorType::Notification => "notification",
            HarvestErrorType::Configuration => "configuration",
        }
    }
}

impl fmt::Display for HarvestErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Harvest error with context
#[derive(Debug, Clone)]
pub struct HarvestError {
    /// Type of error
    pub error_type: HarvestErrorType,

    /// Pass the error happened in, if any
    pub format: Option<RecordFormat>,

    /// Record the error belongs to, if any
    pub object_id: Option<ObjectId>,

    /// Error message
    pub message: String,
}

impl HarvestError {
    /// Create a new harvest error
    pub fn new(error_type: HarvestErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            format: None,
            object_id: None,
            message: message.into(),
        }
    }

    /// Attach the pass
    pub fn in_pass(mut self, format: RecordFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Attach the record
    pub fn for_object(mut self, object_id: &ObjectId) -> Self {
        self.object_id = Some(object_id.clone());
        self
    }
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.error_type)?;
        if let Some(format) = self.format {
            write!(f, " {format}")?;
        }
        if let Some(object_id) = &self.object_id {
            write!(f, " {object_id}")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_summary_creation() {
        let summary = HarvestSummary::new();

        assert_eq!(summary.records_seen, 0);
        assert_eq!(summary.records_processed, 0);
        assert_eq!(summary.records_failed, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(summary.report.is_empty());
        assert!(!summary.notification_sent);
    }

    #[test]
    fn test_harvest_summary_with_duration() {
        let summary = HarvestSummary::new().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_harvest_summary_is_successful() {
        let mut summary = HarvestSummary::new();
        summary.records_processed = 10;
        assert!(summary.is_successful());

        summary.records_failed = 1;
        assert!(!summary.is_successful());

        let mut summary = HarvestSummary::new();
        summary.add_error(HarvestError::new(HarvestErrorType::Fetch, "refused"));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_missing_fields_do_not_fail_the_run() {
        let mut summary = HarvestSummary::new();
        summary.records_with_missing_fields = 3;

        assert!(summary.is_successful());
    }

    #[test]
    fn test_harvest_error_display() {
        let id = ObjectId::new("obj1").unwrap();
        let error = HarvestError::new(HarvestErrorType::Upsert, "HTTP 500")
            .in_pass(RecordFormat::Json)
            .for_object(&id);

        assert_eq!(error.to_string(), "[upsert] json obj1: HTTP 500");
    }

    #[test]
    fn test_error_type_categories() {
        assert_eq!(HarvestErrorType::SecondaryStorage.category(), "secondary_storage");
        assert_eq!(HarvestErrorType::SourceFileMissing.to_string(), "source_file_missing");
    }
}
