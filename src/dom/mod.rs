//! Arena document model
//!
//! The document sink for resolved fragments: NodeId-indexed arena,
//! interned strings, sibling links, deep copy via `Clone`.

pub mod document;
pub mod node;
pub mod strings;

pub use document::{Children, Document};
pub use node::{AttributeRef, Node, NodeId, NodeKind};
pub use strings::StringPool;
