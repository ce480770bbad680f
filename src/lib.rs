//! xmlpick - selective XML fragment extraction
//!
//! Locates sub-elements inside a large XML buffer by a slash-separated
//! tag path (optionally picking the Nth same-named sibling) without
//! parsing the whole document, then optionally materializes the matched
//! bytes into a queryable [`Document`].
//!
//! One linear token scan finds byte offsets; two cache tiers keep
//! repeated queries cheap:
//!
//! - per-[`Builder`], an entry-bounded LRU of resolved byte ranges;
//! - per-domain in the [`Factory`], a byte-cost-bounded LRU of parsed
//!   documents.
//!
//! Iterating sibling indices 0, 1, 2, ... over one path resumes the
//! scanner just past the previous match instead of rescanning from the
//! buffer start.
//!
//! ```
//! use xmlpick::Factory;
//!
//! let mut factory = Factory::new();
//! factory.add_data("config", &b"<root><item id=\"1\"/><item id=\"2\"/></root>"[..]);
//!
//! let doc = factory.build("config", "/root/item", 1).unwrap();
//! let root = doc.root_element().unwrap();
//! assert_eq!(doc.attribute(root, "id"), Some("2"));
//! ```

pub mod cache;
pub mod core;
pub mod dom;
pub mod error;
pub mod path;
pub mod range;
pub mod reader;

mod builder;
mod factory;
mod resolve;

pub use builder::{Builder, ScanStats};
pub use dom::{Document, NodeId, NodeKind};
pub use error::Error;
pub use factory::Factory;
pub use path::TagPath;
pub use range::ByteRange;
