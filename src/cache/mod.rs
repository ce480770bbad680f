//! Cache tiers
//!
//! Two independent bounded caches with different eviction currencies:
//! entry count for resolved offsets, byte cost for parsed documents.

pub mod cost;
pub mod offsets;

pub use cost::CostCache;
pub use offsets::OffsetCache;
