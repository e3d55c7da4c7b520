//! Missing-field report accumulated over a run

use crate::domain::{ObjectId, RecordFormat};

/// A required field that resolved to nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    /// Display name
    pub name: String,

    /// Path as configured
    pub path: String,
}

/// Append-only text listing every object with missing fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingFieldReport {
    text: String,
    objects: usize,
    fields: usize,
}

impl MissingFieldReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one object's block; nothing is added when `missing` is empty
    pub fn append(&mut self, object_id: &ObjectId, format: RecordFormat, missing: &[MissingField]) {
        if missing.is_empty() {
            return;
        }
        self.text.push_str(&render_object(object_id, format, missing));
        self.objects += 1;
        self.fields += missing.len();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Objects with at least one missing field
    pub fn object_count(&self) -> usize {
        self.objects
    }

    /// Total missing-field occurrences
    pub fn field_count(&self) -> usize {
        self.fields
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Render one object's block
pub fn render_object(object_id: &ObjectId, format: RecordFormat, missing: &[MissingField]) -> String {
    let mut block = format!("{object_id} is missing the following required field(s): \n");
    for field in missing {
        block.push_str(&format!(
            "{} - at {} path location {}\n",
            field.name,
            format.as_str(),
            field.path
        ));
    }
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(name: &str, path: &str) -> MissingField {
        MissingField {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_render_object_format() {
        let id = ObjectId::new("obj1").unwrap();
        let block = render_object(
            &id,
            RecordFormat::Json,
            &[missing("Title", "title"), missing("Creator", "creators")],
        );
        assert_eq!(
            block,
            "obj1 is missing the following required field(s): \n\
             Title - at json path location title\n\
             Creator - at json path location creators\n\n"
        );
    }

    #[test]
    fn test_append_skips_complete_objects() {
        let mut report = MissingFieldReport::new();
        report.append(&ObjectId::new("ok").unwrap(), RecordFormat::Xml, &[]);
        assert!(report.is_empty());

        report.append(
            &ObjectId::new("obj2").unwrap(),
            RecordFormat::Xml,
            &[missing("Title", "mets:dmdSec/dcterms:title")],
        );
        assert_eq!(report.object_count(), 1);
        assert_eq!(report.field_count(), 1);
        assert!(report
            .as_str()
            .contains("Title - at xml path location mets:dmdSec/dcterms:title\n"));
    }
}
