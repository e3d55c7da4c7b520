//! Detached XML element tree
//!
//! Records are held as small owned trees. Names are kept exactly as written
//! in the source (qualified, prefix included); prefixes are resolved through
//! a [`NamespaceTable`] when matching.

use super::namespace::{split_qname, NamespaceTable};
use crate::domain::{KioskError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Declaration written at the top of every per-object XML artifact
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

/// One attribute, name as written (`ID`, `xlink:href`, `xmlns:mets`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// Element content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Prefix of the element name, if any
    pub fn prefix(&self) -> Option<&str> {
        split_qname(&self.name).0
    }

    /// Local part of the element name
    pub fn local_name(&self) -> &str {
        split_qname(&self.name).1
    }

    /// Attribute value by name as written
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Attribute value by qualified name, resolving prefixes through `namespaces`
    ///
    /// Falls back to a literal name comparison when either prefix is unbound.
    pub fn attribute_resolved(&self, name: &str, namespaces: &NamespaceTable) -> Option<&str> {
        if let Some(value) = self.attribute(name) {
            return Some(value);
        }
        let (prefix, local) = split_qname(name);
        let uri = prefix.and_then(|p| namespaces.resolve(p))?;
        self.attributes
            .iter()
            .find(|a| {
                let (a_prefix, a_local) = split_qname(&a.name);
                a_local == local && a_prefix.and_then(|p| namespaces.resolve(p)) == Some(uri)
            })
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(XmlAttribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Text before the first child element, as written; `None` when empty
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => text.push_str(t),
                XmlNode::Element(_) => break,
            }
        }
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Whether this element's name matches `qname`
    ///
    /// Both names are compared as (namespace URI, local name) when their
    /// prefixes are bound in `namespaces`; otherwise the prefixes are
    /// compared literally. `*` matches any element.
    pub fn matches(&self, qname: &str, namespaces: &NamespaceTable) -> bool {
        if qname == "*" {
            return true;
        }
        let (want_prefix, want_local) = split_qname(qname);
        if want_local != self.local_name() {
            return false;
        }
        let have_prefix = self.prefix();
        match (
            want_prefix.and_then(|p| namespaces.resolve(p)),
            have_prefix.and_then(|p| namespaces.resolve(p)),
        ) {
            (Some(want_uri), Some(have_uri)) => want_uri == have_uri,
            _ => want_prefix == have_prefix,
        }
    }

    /// Serialize as a standalone document with the XML declaration
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails
    pub fn to_document(&self) -> Result<Vec<u8>> {
        let mut buffer = XML_DECLARATION.as_bytes().to_vec();
        let mut writer = Writer::new(&mut buffer);
        write_element(&mut writer, self)?;
        Ok(buffer)
    }
}

fn xml_write_error(e: impl std::fmt::Display) -> KioskError {
    KioskError::Xml(format!("Failed to serialize record: {e}"))
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attribute in &element.attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(xml_write_error)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(xml_write_error)?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(xml_write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_write_error)?;
    Ok(())
}
