//! Required-field validation
//!
//! Each record is checked against an ordered map of display name → path.
//! XML paths are evaluated with [`XmlPath`]; JSON paths are direct keys.
//! A field is missing when it resolves to nothing, `null` or an empty
//! string. Missing fields are reported, never raised.

pub mod report;
pub mod xpath;

pub use report::{render_object, MissingField, MissingFieldReport};
pub use xpath::XmlPath;

use crate::config::{ProcessingConfig, RequiredField};
use crate::core::split::{JsonRecord, NamespaceTable, XmlElement};
use crate::domain::{ObjectId, Result};
use serde_json::Value;

/// Ordered display name → path entries
#[derive(Debug, Clone, Default)]
pub struct FieldPathMap {
    entries: Vec<(RequiredField, Option<XmlPath>)>,
}

impl FieldPathMap {
    /// Entries with compiled XML paths
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first malformed path
    pub fn for_xml(fields: &[RequiredField]) -> Result<Self> {
        let entries = fields
            .iter()
            .map(|field| Ok((field.clone(), Some(XmlPath::parse(&field.path)?))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Entries naming top-level JSON keys
    pub fn for_json(fields: &[RequiredField]) -> Self {
        Self {
            entries: fields.iter().map(|f| (f.clone(), None)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn missing(field: &RequiredField) -> MissingField {
    MissingField {
        name: field.name.clone(),
        path: field.path.clone(),
    }
}

fn json_value_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Checks records against the configured required fields
#[derive(Debug, Clone, Default)]
pub struct RequiredFieldValidator {
    xml_fields: FieldPathMap,
    json_fields: FieldPathMap,
}

impl RequiredFieldValidator {
    pub fn new(xml_fields: FieldPathMap, json_fields: FieldPathMap) -> Self {
        Self {
            xml_fields,
            json_fields,
        }
    }

    /// Build from `[processing]`
    ///
    /// # Errors
    ///
    /// Returns a validation error if an XML path doesn't compile
    pub fn from_config(config: &ProcessingConfig) -> Result<Self> {
        Ok(Self::new(
            FieldPathMap::for_xml(&config.xml_required_fields)?,
            FieldPathMap::for_json(&config.json_required_fields),
        ))
    }

    /// Missing fields of a METS record, in configuration order
    pub fn validate_xml(
        &self,
        object_id: &ObjectId,
        root: &XmlElement,
        namespaces: &NamespaceTable,
    ) -> Vec<MissingField> {
        let mut result = Vec::new();
        for (field, path) in &self.xml_fields.entries {
            let present = path
                .as_ref()
                .and_then(|p| p.first_value(root, namespaces))
                .is_some();
            if !present {
                crate::log_missing_field!(object_id, &field.name, &field.path);
                result.push(missing(field));
            }
        }
        result
    }

    /// Missing fields of a JSON record, in configuration order
    pub fn validate_json(&self, object_id: &ObjectId, record: &JsonRecord) -> Vec<MissingField> {
        let mut result = Vec::new();
        for (field, _) in &self.json_fields.entries {
            if !json_value_present(record.get(&field.path)) {
                crate::log_missing_field!(object_id, &field.name, &field.path);
                result.push(missing(field));
            }
        }
        result
    }
}
