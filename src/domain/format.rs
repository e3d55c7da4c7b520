//! Record format

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serialization format of a composite document and its per-object records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// METS XML
    Xml,
    /// Embark JSON
    Json,
}

impl RecordFormat {
    /// Value of the Embark `format` query parameter and the report label
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Xml => "xml",
            RecordFormat::Json => "json",
        }
    }

    /// File extension of per-object artifacts
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// MIME type used when uploading per-object artifacts
    pub fn mime_type(&self) -> &'static str {
        match self {
            RecordFormat::Xml => "text/xml",
            RecordFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xml" | "mets" => Ok(RecordFormat::Xml),
            "json" => Ok(RecordFormat::Json),
            other => Err(format!("Unknown record format '{other}'. Must be xml or json")),
        }
    }
}
