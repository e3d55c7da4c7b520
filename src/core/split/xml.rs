//! Streaming METS splitter
//!
//! Composite METS exports hold every museum object, so the document is
//! never materialised: a forward scan builds one record subtree at a time
//! and hands it out before reading on.

use super::namespace::{declaration_attribute, declared_prefix, NamespaceTable};
use super::tree::{XmlAttribute, XmlElement, XmlNode};
use crate::domain::{KioskError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Namespace URI of the `xsi` prefix
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// One top-level object record
#[derive(Debug, Clone)]
pub struct XmlRecord {
    /// Record root with namespace declarations stamped on
    pub root: XmlElement,

    /// Bindings known when the record was emitted
    pub namespaces: NamespaceTable,
}

/// Lazily splits a composite XML document into per-object records
///
/// Direct children of the document root whose name matches the record tag
/// become records, in document order. Every record root carries a
/// declaration for each prefix bound so far (unless it already declares
/// that prefix) plus `xmlns:xsi` and `xsi:schemaLocation`, so each record
/// serializes as standalone XML. A default namespace is only carried over
/// when the document root declares it.
pub struct NamespaceAwareXmlSplitter<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    record_tag: String,
    schema_location: String,
    namespaces: NamespaceTable,
    // Open elements below the document root; empty between records
    stack: Vec<XmlElement>,
    depth: usize,
    // Default namespace declared on the document root
    root_default: Option<String>,
    finished: bool,
}

impl NamespaceAwareXmlSplitter<BufReader<File>> {
    /// Open a composite document on disk
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::SourceFileMissing`] when the file doesn't exist
    pub fn open(path: &Path, record_tag: &str, schema_location: &str) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KioskError::SourceFileMissing(path.to_path_buf())
            } else {
                KioskError::Io(format!("Failed to open {}: {e}", path.display()))
            }
        })?;
        Ok(Self::from_reader(
            BufReader::new(file),
            record_tag,
            schema_location,
        ))
    }
}

impl<R: BufRead> NamespaceAwareXmlSplitter<R> {
    /// Split any buffered reader
    pub fn from_reader(reader: R, record_tag: &str, schema_location: &str) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            record_tag: record_tag.to_string(),
            schema_location: schema_location.to_string(),
            namespaces: NamespaceTable::new(),
            stack: Vec::new(),
            depth: 0,
            root_default: None,
            finished: false,
        }
    }

    /// Bindings discovered so far; complete once the iterator is exhausted
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    fn xml_error(&self, e: impl std::fmt::Display) -> KioskError {
        KioskError::Xml(format!(
            "{e} (at byte {})",
            self.reader.buffer_position()
        ))
    }

    /// Build an element from a start tag, recording its namespace declarations
    fn element_from(&mut self, start: &BytesStart<'_>) -> Result<XmlElement> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| self.xml_error(e))?
            .to_string();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(e))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| self.xml_error(e))?
                .to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.xml_error(e))?
                .into_owned();

            if let Some(prefix) = declared_prefix(&key) {
                self.namespaces.insert(prefix, &value);
            }
            attributes.push(XmlAttribute { name: key, value });
        }

        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn is_record(&self, element: &XmlElement) -> bool {
        element.matches(&self.record_tag, &self.namespaces)
    }

    /// Stamp known bindings and the xsi pair onto a record root
    fn finish_record(&self, mut root: XmlElement) -> XmlRecord {
        for (prefix, uri) in self.namespaces.iter() {
            // Unprefixed names stay in whatever default is in scope here
            if prefix.is_empty() {
                continue;
            }
            let attribute = declaration_attribute(prefix);
            if root.attribute(&attribute).is_none() {
                root.set_attribute(&attribute, uri);
            }
        }
        if let Some(uri) = &self.root_default {
            if root.attribute("xmlns").is_none() {
                root.set_attribute("xmlns", uri);
            }
        }
        root.set_attribute("xsi:schemaLocation", &self.schema_location);
        root.set_attribute("xmlns:xsi", XSI_NAMESPACE);

        XmlRecord {
            root,
            namespaces: self.namespaces.clone(),
        }
    }

    /// Attach a completed element to its parent, or emit it when it's a record
    fn close_element(&mut self, element: XmlElement) -> Option<XmlRecord> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(XmlNode::Element(element));
            return None;
        }

        // Direct child of the document root
        if self.is_record(&element) {
            return Some(self.finish_record(element));
        }
        tracing::debug!(
            category = "split",
            element = %element.name,
            "Skipping non-record child of document root"
        );
        None
    }

    fn push_text(&mut self, text: String) {
        if let Some(current) = self.stack.last_mut() {
            match current.children.last_mut() {
                Some(XmlNode::Text(existing)) => existing.push_str(&text),
                _ => current.children.push(XmlNode::Text(text)),
            }
        }
    }

    fn next_record(&mut self) -> Result<Option<XmlRecord>> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| KioskError::Xml(e.to_string()))?
                .into_owned();

            match event {
                Event::Start(start) => {
                    let element = self.element_from(&start)?;
                    self.depth += 1;
                    if self.depth == 1 {
                        self.root_default = element.attribute("xmlns").map(str::to_string);
                    } else {
                        self.stack.push(element);
                    }
                }
                Event::Empty(start) => {
                    let element = self.element_from(&start)?;
                    if self.depth == 0 {
                        // Self-closed document root: nothing to split
                        continue;
                    }
                    if let Some(record) = self.close_element(element) {
                        return Ok(Some(record));
                    }
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        continue;
                    }
                    let Some(element) = self.stack.pop() else {
                        return Err(self.xml_error("unbalanced end tag"));
                    };
                    if let Some(record) = self.close_element(element) {
                        return Ok(Some(record));
                    }
                }
                Event::Text(text) => {
                    if !self.stack.is_empty() {
                        let text = text.unescape().map_err(|e| self.xml_error(e))?.into_owned();
                        self.push_text(text);
                    }
                }
                Event::CData(data) => {
                    if !self.stack.is_empty() {
                        let text = String::from_utf8(data.into_inner().into_owned())
                            .map_err(|e| self.xml_error(e))?;
                        self.push_text(text);
                    }
                }
                Event::Eof => {
                    if self.depth != 0 {
                        return Err(self.xml_error("unexpected end of document"));
                    }
                    return Ok(None);
                }
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for NamespaceAwareXmlSplitter<R> {
    type Item = Result<XmlRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                // A malformed document ends the scan
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
