//! Composite document splitting
//!
//! - [`NamespaceAwareXmlSplitter`] streams a composite METS document and
//!   yields self-contained per-object subtrees
//! - [`JsonObjectSplitter`] yields the entries of a composite JSON document
//! - [`NamespaceTable`] holds the prefix bindings discovered during the scan

pub mod json;
pub mod namespace;
pub mod tree;
pub mod xml;

pub use json::{JsonObjectSplitter, JsonRecord};
pub use namespace::NamespaceTable;
pub use tree::{XmlAttribute, XmlElement, XmlNode, XML_DECLARATION};
pub use xml::{NamespaceAwareXmlSplitter, XmlRecord, XSI_NAMESPACE};
