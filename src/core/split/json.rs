//! Composite JSON splitter

use crate::domain::{KioskError, ObjectId, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Key of the top-level record sequence
pub const OBJECTS_KEY: &str = "objects";

const DIGITAL_ASSETS_KEY: &str = "digitalAssets";
const FILE_DESCRIPTION_KEY: &str = "fileDescription";

/// One object from the composite JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    id_field: String,
    object: Map<String, Value>,
}

impl JsonRecord {
    /// The object's identifier
    ///
    /// Non-string identifiers are rendered with their JSON text.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the identifier is blank or unusable
    /// as a file name
    pub fn id(&self) -> Result<ObjectId> {
        let raw = match self.object.get(&self.id_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        ObjectId::new(raw).map_err(KioskError::Validation)
    }

    /// `fileDescription` of every entry in `digitalAssets`
    pub fn digital_assets(&self) -> Vec<String> {
        self.object
            .get(DIGITAL_ASSETS_KEY)
            .and_then(Value::as_array)
            .map(|assets| {
                assets
                    .iter()
                    .filter_map(|asset| asset.get(FILE_DESCRIPTION_KEY))
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct key lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.object.get(key)
    }

    /// Serialize the object as written to per-object artifacts
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.object)?)
    }
}

/// Yields the entries of the composite document's `objects` sequence
///
/// Entries that are not objects, or that lack the identifier field, are
/// skipped silently. A document without `objects` yields nothing.
pub struct JsonObjectSplitter {
    id_field: String,
    objects: std::vec::IntoIter<Value>,
}

impl JsonObjectSplitter {
    /// Split an already parsed document
    pub fn new(document: Value, id_field: &str) -> Self {
        let objects = match document {
            Value::Object(mut root) => match root.remove(OBJECTS_KEY) {
                Some(Value::Array(objects)) => objects,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Self {
            id_field: id_field.to_string(),
            objects: objects.into_iter(),
        }
    }

    /// Read and split a composite document on disk
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::SourceFileMissing`] when the file doesn't exist
    /// and a serialization error when it isn't valid JSON
    pub fn open(path: &Path, id_field: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KioskError::SourceFileMissing(path.to_path_buf())
            } else {
                KioskError::Io(format!("Failed to read {}: {e}", path.display()))
            }
        })?;
        let document: Value = serde_json::from_str(&contents)?;
        Ok(Self::new(document, id_field))
    }
}

impl Iterator for JsonObjectSplitter {
    type Item = JsonRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for value in self.objects.by_ref() {
            if let Value::Object(object) = value {
                if object.contains_key(&self.id_field) {
                    return Some(JsonRecord {
                        id_field: self.id_field.clone(),
                        object,
                    });
                }
            }
        }
        None
    }
}
