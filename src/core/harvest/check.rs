//! Offline check of a local composite document
//!
//! Splits and validates without fetching or distributing anything.

use super::coordinator::xml_object_id;
use crate::config::ProcessingConfig;
use crate::core::split::{JsonObjectSplitter, NamespaceAwareXmlSplitter};
use crate::core::validate::{MissingFieldReport, RequiredFieldValidator, XmlPath};
use crate::domain::{RecordFormat, Result};
use std::path::Path;

/// Outcome of checking one composite document
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    /// Records yielded by the splitter
    pub records: usize,

    /// Records whose identifier could not be resolved
    pub unidentified: usize,

    /// Missing-field report for the identified records
    pub report: MissingFieldReport,
}

/// Split and validate a composite document on disk
///
/// # Errors
///
/// Returns an error if the file is missing, malformed, or if a configured
/// XML path doesn't compile
pub fn check_composite(
    processing: &ProcessingConfig,
    path: &Path,
    format: RecordFormat,
) -> Result<CheckOutcome> {
    let validator = RequiredFieldValidator::from_config(processing)?;
    let mut outcome = CheckOutcome::default();

    match format {
        RecordFormat::Xml => {
            let identifier_path = XmlPath::parse(&processing.xml_identifier_path)?;
            let splitter = NamespaceAwareXmlSplitter::open(
                path,
                &processing.xml_record_tag,
                &processing.xsi_schema_location,
            )?;
            for record in splitter {
                let record = record?;
                outcome.records += 1;
                match xml_object_id(&identifier_path, &record) {
                    Ok(id) => {
                        let missing = validator.validate_xml(&id, &record.root, &record.namespaces);
                        outcome.report.append(&id, format, &missing);
                    }
                    Err(e) => {
                        tracing::warn!(category = "parse", error = %e, "Record without identifier");
                        outcome.unidentified += 1;
                    }
                }
            }
        }
        RecordFormat::Json => {
            let splitter = JsonObjectSplitter::open(path, &processing.json_identifier_field)?;
            for record in splitter {
                outcome.records += 1;
                match record.id() {
                    Ok(id) => {
                        let missing = validator.validate_json(&id, &record);
                        outcome.report.append(&id, format, &missing);
                    }
                    Err(e) => {
                        tracing::warn!(category = "parse", error = %e, "Record without identifier");
                        outcome.unidentified += 1;
                    }
                }
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequiredField;
    use crate::domain::KioskError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn processing() -> ProcessingConfig {
        ProcessingConfig {
            json_required_fields: vec![RequiredField::new("Title", "title")],
            ..Default::default()
        }
    }

    #[test]
    fn test_check_json_reports_missing_title() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"objects":[{{"uniqueIdentifier":"obj1"}},{{"uniqueIdentifier":"obj2","title":"Vase"}},{{"name":"noise"}}]}}"#
        )
        .unwrap();

        let outcome = check_composite(&processing(), file.path(), RecordFormat::Json).unwrap();

        assert_eq!(outcome.records, 2);
        assert_eq!(outcome.unidentified, 0);
        assert_eq!(outcome.report.object_count(), 1);
        assert!(outcome
            .report
            .as_str()
            .starts_with("obj1 is missing the following required field(s)"));
    }

    #[test]
    fn test_check_missing_file() {
        let result = check_composite(
            &processing(),
            Path::new("/nonexistent/composite.xml"),
            RecordFormat::Xml,
        );

        assert!(matches!(result, Err(KioskError::SourceFileMissing(_))));
    }
}
