//! Arena-based XML document
//!
//! Built once from reader events over a self-contained fragment; queried
//! by element name, attribute, children, and text content. `Clone` is a
//! deep copy: cached documents are handed out as independent copies.

use super::node::{AttributeRef, Node, NodeId, NodeKind};
use super::strings::StringPool;
use crate::error::Error;
use crate::reader::events::{ElementStart, XmlEvent};
use crate::reader::slice::SliceReader;

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    attributes: Vec<AttributeRef>,
    strings: StringPool,
    root: Option<NodeId>,
    source_len: usize,
}

impl Document {
    /// Parse a self-contained XML fragment into a document.
    ///
    /// The fragment must hold exactly one element; mismatched or unclosed
    /// tags, missing or extra root elements, and non-whitespace text
    /// outside the root are rejected with `Error::ParseFailed`.
    pub fn parse(input: &[u8]) -> Result<Self, Error> {
        let mut doc = Document {
            nodes: Vec::new(),
            attributes: Vec::new(),
            strings: StringPool::new(),
            root: None,
            source_len: input.len(),
        };
        let mut stack: Vec<NodeId> = Vec::new();
        let mut reader = SliceReader::new(input);

        loop {
            let Some(event) = reader.next_event() else {
                // Tokenizer stopped on malformed markup
                break;
            };

            match event {
                XmlEvent::StartElement(start) => {
                    let id = doc.add_element(&start, stack.last().copied())?;
                    stack.push(id);
                }

                XmlEvent::EmptyElement(start) => {
                    doc.add_element(&start, stack.last().copied())?;
                }

                XmlEvent::EndElement(end) => {
                    let Some(open_id) = stack.pop() else {
                        return Err(parse_failed("unexpected end tag"));
                    };
                    let open_name = doc.name(open_id).unwrap_or("");
                    if end.name_str() != Some(open_name) {
                        return Err(parse_failed(&format!(
                            "mismatched end tag: expected </{}>",
                            open_name
                        )));
                    }
                }

                XmlEvent::Text(content) => {
                    if stack.is_empty() {
                        if !content.iter().all(|b| b.is_ascii_whitespace()) {
                            return Err(parse_failed("text outside of document element"));
                        }
                    } else {
                        doc.add_text(NodeKind::Text, &content, stack.last().copied())?;
                    }
                }

                XmlEvent::CData(content) => {
                    if !stack.is_empty() {
                        doc.add_text(NodeKind::CData, &content, stack.last().copied())?;
                    }
                }

                XmlEvent::Comment(_)
                | XmlEvent::ProcessingInstruction { .. }
                | XmlEvent::Declaration
                | XmlEvent::DocType => {}

                XmlEvent::EndDocument => break,
            }
        }

        if let Some(&open_id) = stack.last() {
            return Err(parse_failed(&format!(
                "unclosed element <{}>",
                doc.name(open_id).unwrap_or("")
            )));
        }
        if doc.root.is_none() {
            return Err(parse_failed("no document element"));
        }

        Ok(doc)
    }

    /// The root element.
    #[inline]
    pub fn root_element(&self) -> Option<NodeId> {
        self.root
    }

    /// Byte length of the source fragment this document was parsed from.
    ///
    /// Used as the cost signal for cost-bounded caching.
    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node kind, if the id is valid.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id as usize).map(|n| n.kind)
    }

    /// Element name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        let node = self.nodes.get(id as usize)?;
        if node.is_element() {
            self.strings.get(node.name_id)
        } else {
            None
        }
    }

    /// Attribute value by name.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        for attr in self.attribute_refs(id) {
            if self.strings.get(attr.name_id) == Some(name) {
                return self.strings.get(attr.value_id);
            }
        }
        None
    }

    /// All attribute name/value pairs of an element.
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.attribute_refs(id)
            .iter()
            .filter_map(|attr| {
                Some((self.strings.get(attr.name_id)?, self.strings.get(attr.value_id)?))
            })
            .collect()
    }

    /// Iterate over all child nodes of an element.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.nodes.get(id as usize).and_then(|n| n.first_child),
        }
    }

    /// Iterate over element children only.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(move |&child| self.nodes[child as usize].is_element())
    }

    /// First child element with the given name.
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.element_children(id).find(|&c| self.name(c) == Some(name))
    }

    /// Concatenated text content of a node and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id as usize) else {
            return;
        };
        match node.kind {
            NodeKind::Text | NodeKind::CData => {
                if let Some(content) = self.strings.get(node.name_id) {
                    out.push_str(content);
                }
            }
            NodeKind::Element => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn attribute_refs(&self, id: NodeId) -> &[AttributeRef] {
        match self.nodes.get(id as usize) {
            Some(node) if node.is_element() => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                if end <= self.attributes.len() {
                    &self.attributes[start..end]
                } else {
                    &[]
                }
            }
            _ => &[],
        }
    }

    fn add_element(
        &mut self,
        start: &ElementStart<'_>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        if parent.is_none() && self.root.is_some() {
            return Err(parse_failed("extra content after document element"));
        }

        let Some(name) = start.name_str() else {
            return Err(parse_failed("element name is not valid UTF-8"));
        };
        let name_id = self.strings.intern(name);

        let mut node = Node::element(name_id, parent);
        node.attr_start = self.attributes.len() as u32;
        node.attr_count = start.attributes.len().min(u16::MAX as usize) as u16;
        for attr in &start.attributes {
            let (Some(attr_name), Some(attr_value)) = (attr.name_str(), attr.value_str()) else {
                return Err(parse_failed("attribute is not valid UTF-8"));
            };
            let name_id = self.strings.intern(attr_name);
            let value_id = self.strings.intern(attr_value);
            self.attributes.push(AttributeRef { name_id, value_id });
        }

        Ok(self.push_node(node, parent))
    }

    fn add_text(
        &mut self,
        kind: NodeKind,
        content: &[u8],
        parent: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        let Ok(content) = std::str::from_utf8(content) else {
            return Err(parse_failed("text content is not valid UTF-8"));
        };
        let content_id = self.strings.intern(content);
        Ok(self.push_node(Node::text(kind, content_id, parent), parent))
    }

    fn push_node(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let is_element = node.is_element();
        self.nodes.push(node);

        match parent {
            Some(parent_id) => {
                let prev_last = self.nodes[parent_id as usize].last_child;
                match prev_last {
                    Some(prev) => self.nodes[prev as usize].next_sibling = Some(id),
                    None => self.nodes[parent_id as usize].first_child = Some(id),
                }
                self.nodes[parent_id as usize].last_child = Some(id);
            }
            None => {
                if is_element && self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }

        id
    }
}

fn parse_failed(message: &str) -> Error {
    Error::ParseFailed(message.to_string())
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.nodes.get(current as usize).and_then(|n| n.next_sibling);
        Some(current)
    }
}
