//! Owned XML element tree.
//!
//! Parsing goes through `roxmltree`. The tree drops whitespace-only text
//! between child elements, keeps attributes in a sorted map and ignores
//! namespaces, so two documents compare equal when they describe the same
//! block graph even if their formatting or attribute order differ. Text of
//! a leaf element is kept verbatim, whitespace included.

use std::collections::BTreeMap;

use bizlogic_core::toolbox::escape_xml;

use crate::error::WorkspaceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Parses a document and returns its root element.
    pub fn parse(text: &str) -> Result<Self, WorkspaceError> {
        let document = roxmltree::Document::parse(text)?;
        Ok(convert(document.root_element()))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Serializes the element without namespace declarations.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, None);
        out
    }

    /// Serializes the element as a document root in the default namespace `ns`.
    pub fn to_document(&self, ns: &str) -> String {
        let mut out = String::new();
        self.write(&mut out, Some(ns));
        out
    }

    fn write(&self, out: &mut String, ns: Option<&str>) {
        out.push('<');
        out.push_str(&self.name);
        if let Some(ns) = ns {
            out.push_str(" xmlns=\"");
            out.push_str(&escape_xml(ns));
            out.push('"');
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write(out, None),
                XmlNode::Text(text) => out.push_str(&escape_xml(text)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        element
            .attributes
            .insert(attribute.name().to_string(), attribute.value().to_string());
    }
    for child in node.children() {
        if child.is_element() {
            element.children.push(XmlNode::Element(convert(child)));
        } else if child.is_text() {
            if let Some(text) = child.text().filter(|text| !text.is_empty()) {
                element.children.push(XmlNode::Text(text.to_string()));
            }
        }
    }
    // Whitespace between child elements is formatting; in a leaf it is a value.
    if element.elements().next().is_some() {
        element.children.retain(|child| match child {
            XmlNode::Text(text) => !text.trim().is_empty(),
            XmlNode::Element(_) => true,
        });
    }
    element
}
