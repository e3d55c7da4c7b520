//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers flowing through a harvest run, so an
//! object identifier can't be passed where a remote file id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Museum object identifier
///
/// Extracted from each record (the `dcterms:identifier` of a METS record or
/// the `uniqueIdentifier` of a JSON object). It also names the per-object
/// artifact on disk and in the remote stores, so path separators are rejected.
///
/// # Examples
///
/// ```
/// use kiosk_export::domain::ids::ObjectId;
/// use std::str::FromStr;
///
/// let id = ObjectId::from_str("1976.057.001").unwrap();
/// assert_eq!(id.file_name("xml"), "1976.057.001.xml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates a new ObjectId, trimming surrounding whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err("Object ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('\\') {
            return Err(format!("Object ID cannot contain path separators: {id}"));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the object ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the per-object artifact with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a file in the remote document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    /// Creates a new FileId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("File ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the file ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
