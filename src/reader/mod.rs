//! Pull-event reading layer
//!
//! Event types and the slice reader that produces them from raw bytes.

pub mod events;
pub mod slice;

pub use events::XmlEvent;
pub use slice::SliceReader;
