//! Document node representation
//!
//! Arena nodes addressed by `NodeId` (u32) with sibling links, so
//! traversal never chases heap pointers.

/// Compact node identifier (index into the document arena).
pub type NodeId = u32;

/// Type of document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
}

/// A node in the document arena.
///
/// `name_id` points at the element name for elements, or at the content
/// for text/CDATA nodes.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub name_id: u32,
    /// Start of this element's attributes in the attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
}

impl Node {
    /// Create an element node.
    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        Node {
            kind: NodeKind::Element,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create a text or CDATA node.
    pub fn text(kind: NodeKind, content_id: u32, parent: Option<NodeId>) -> Self {
        Node {
            kind,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id: content_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }
}

/// An attribute in the attribute arena, name and value interned.
#[derive(Debug, Clone)]
pub struct AttributeRef {
    pub name_id: u32,
    pub value_id: u32,
}
