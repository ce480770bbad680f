//! XML event types
//!
//! Pull-parser events produced by the slice reader and consumed by the
//! document builder.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// XML parsing event.
#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// Start of an element: `<name attrs...>`
    StartElement(ElementStart<'a>),
    /// End of an element: `</name>`
    EndElement(ElementEnd<'a>),
    /// Empty element: `<name attrs.../>`
    EmptyElement(ElementStart<'a>),
    /// Text content between tags, entities decoded
    Text(Cow<'a, [u8]>),
    /// CDATA section content, verbatim
    CData(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// Processing instruction: `<?target data?>`
    ProcessingInstruction {
        target: &'a [u8],
        data: Option<Cow<'a, [u8]>>,
    },
    /// XML declaration: `<?xml ...?>`
    Declaration,
    /// DOCTYPE declaration
    DocType,
    /// End of document
    EndDocument,
}

/// Start/empty element event data.
#[derive(Debug, Clone)]
pub struct ElementStart<'a> {
    /// Element name as written (any prefix included)
    pub name: &'a [u8],
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> ElementStart<'a> {
    /// Get the name as a string.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Get an attribute value by name as a string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }
}

/// End element event data.
#[derive(Debug, Clone)]
pub struct ElementEnd<'a> {
    /// Element name as written
    pub name: &'a [u8],
}

impl<'a> ElementEnd<'a> {
    /// Get the name as a string.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let start = ElementStart {
            name: b"item",
            attributes: crate::core::attributes::parse_attributes(b" id=\"7\" kind=\"x\""),
        };
        assert_eq!(start.name_str(), Some("item"));
        assert_eq!(start.attribute("id"), Some("7"));
        assert_eq!(start.attribute("missing"), None);
    }
}
