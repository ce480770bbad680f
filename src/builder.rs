//! Builder - fragment resolution over one buffer
//!
//! Owns the raw XML buffer, the offset cache, and the sequential-read
//! cursor. Resolution checks the cache, then either continues the
//! previous scan (same path, next sibling index) or scans fresh from the
//! buffer start.

use crate::cache::OffsetCache;
use crate::dom::Document;
use crate::error::Error;
use crate::path::TagPath;
use crate::range::ByteRange;
use crate::resolve::{self, Cursor};
use log::{debug, trace};

/// Default offset cache capacity, in entries.
const DEFAULT_CACHE_ENTRIES: usize = 50;

/// Counters for scanner activity.
///
/// Lets callers observe cache effectiveness: a cached resolution adds no
/// scan, a sequential continuation reads fewer tokens than a cold scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Number of scans started (fresh or resumed)
    pub scans: u64,
    /// Number of tokens read across all scans
    pub tokens: u64,
}

/// Where the sequential cursor sits: just past the match for
/// (canonical path, index), recorded only by an actual scan.
struct Session {
    cursor: Cursor,
    path: String,
    index: u32,
}

/// Resolves tag-path queries against a single XML buffer.
pub struct Builder {
    data: Vec<u8>,
    cache: OffsetCache,
    session: Option<Session>,
    last_error: Option<Error>,
    stats: ScanStats,
}

impl Builder {
    /// Create a builder with no buffer.
    pub fn new() -> Self {
        Builder {
            data: Vec::new(),
            cache: OffsetCache::new(DEFAULT_CACHE_ENTRIES),
            session: None,
            last_error: None,
            stats: ScanStats::default(),
        }
    }

    /// Create a builder over the given buffer.
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let mut builder = Self::new();
        builder.set_data(data);
        builder
    }

    /// Replace the buffer.
    ///
    /// Discards all derived state: the offset cache (whose ranges point
    /// into the old buffer), the sequential cursor, and the last error.
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
        self.cache.clear();
        self.session = None;
        self.last_error = None;
        debug!("builder: buffer replaced ({} bytes)", self.data.len());
    }

    /// The current buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Change the offset cache capacity (entry count).
    pub fn set_cache_size(&mut self, capacity: usize) {
        self.cache.set_capacity(capacity);
    }

    /// Drop all cached offsets. Buffer and cursor are untouched.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The error recorded by the most recent failed operation. Cleared
    /// by a subsequent successful resolution.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Scanner activity counters.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Locate the byte range of the element at `path` and `index`.
    pub fn locate(&mut self, path: &str, index: u32) -> Result<ByteRange, Error> {
        let Some(tag_path) = TagPath::parse(path) else {
            return Err(self.fail(Error::StartElementNotFound));
        };

        let key = tag_path.cache_key(index);
        if let Some(&range) = self.cache.get(&key) {
            trace!("builder: offset cache hit for {}", key);
            self.last_error = None;
            return Ok(range);
        }

        let canonical = tag_path.canonical();
        let sequential = self
            .session
            .as_ref()
            .is_some_and(|s| s.path == canonical && index > 0 && s.index == index - 1);

        let result = if sequential {
            trace!("builder: sequential continuation for {}", key);
            let session = self.session.take();
            let cursor = session.map(|s| s.cursor);
            let segments = tag_path.segments();
            resolve::scan(
                &self.data,
                &segments[segments.len() - 1..],
                0,
                cursor,
                &mut self.stats,
            )
        } else {
            trace!("builder: cold scan for {}", key);
            resolve::scan(&self.data, tag_path.segments(), index, None, &mut self.stats)
        };

        match result {
            Ok((range, cursor)) => {
                self.cache.insert(key, range);
                self.session = Some(Session {
                    cursor,
                    path: canonical,
                    index,
                });
                self.last_error = None;
                Ok(range)
            }
            Err(error) => {
                self.session = None;
                Err(self.fail(error))
            }
        }
    }

    /// Resolve `path`/`index` and return the matched bytes as a slice
    /// borrowed from the buffer.
    ///
    /// The borrow ties the slice to this builder: the buffer cannot be
    /// replaced while the slice is alive.
    pub fn find(&mut self, path: &str, index: u32) -> Result<&[u8], Error> {
        let range = self.locate(path, index)?;
        Ok(range.slice(&self.data))
    }

    /// Resolve `path`/`index` and parse the matched bytes into a
    /// document.
    ///
    /// The document's `source_len()` carries the byte cost used by the
    /// factory's document cache.
    pub fn build(&mut self, path: &str, index: u32) -> Result<Document, Error> {
        let range = self.locate(path, index)?;
        match Document::parse(range.slice(&self.data)) {
            Ok(document) => {
                self.last_error = None;
                Ok(document)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        self.last_error = Some(error.clone());
        error
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: &[u8] = b"<root><item id=\"1\"/><item id=\"2\"/></root>";

    #[test]
    fn test_find_by_index() {
        let mut builder = Builder::with_data(ITEMS);
        assert_eq!(builder.find("/root/item", 0).unwrap(), b"<item id=\"1\"/>");
        assert_eq!(builder.find("/root/item", 1).unwrap(), b"<item id=\"2\"/>");
        assert_eq!(
            builder.find("/root/item", 2),
            Err(Error::StartElementNotFound)
        );
    }

    #[test]
    fn test_missing_path() {
        let mut builder = Builder::with_data(ITEMS);
        assert_eq!(
            builder.find("/root/missing", 0),
            Err(Error::StartElementNotFound)
        );
        assert_eq!(builder.last_error(), Some(&Error::StartElementNotFound));
    }

    #[test]
    fn test_malformed_buffer() {
        let mut builder = Builder::with_data(b"<root><item>" as &[u8]);
        assert_eq!(
            builder.find("/root/item", 0),
            Err(Error::EndElementNotFound)
        );
        assert_eq!(builder.last_error(), Some(&Error::EndElementNotFound));
    }

    #[test]
    fn test_empty_path_fails_without_scan() {
        let mut builder = Builder::with_data(ITEMS);
        assert_eq!(builder.find("", 0), Err(Error::StartElementNotFound));
        assert_eq!(builder.find("/", 0), Err(Error::StartElementNotFound));
        assert_eq!(builder.stats().scans, 0);
    }

    #[test]
    fn test_cache_transparent_to_results() {
        let mut builder = Builder::with_data(ITEMS);
        let cold = builder.locate("/root/item", 1).unwrap();
        let warm = builder.locate("/root/item", 1).unwrap();
        assert_eq!(cold, warm);
    }

    #[test]
    fn test_second_resolution_does_not_rescan() {
        let mut builder = Builder::with_data(ITEMS);
        builder.locate("/root/item", 0).unwrap();
        let scans_after_first = builder.stats().scans;
        builder.locate("/root/item", 0).unwrap();
        assert_eq!(builder.stats().scans, scans_after_first);
    }

    #[test]
    fn test_clear_cache_forces_rescan_same_range() {
        let mut builder = Builder::with_data(ITEMS);
        let first = builder.locate("/root/item", 1).unwrap();
        builder.clear_cache();
        let again = builder.locate("/root/item", 1).unwrap();
        assert_eq!(first, again);
        assert_eq!(builder.stats().scans, 2);
    }

    #[test]
    fn test_sequential_read_fewer_tokens() {
        let mut xml = Vec::from(&b"<root>"[..]);
        for i in 0..20 {
            xml.extend_from_slice(format!("<item id=\"{}\"><v>x</v></item>", i).as_bytes());
        }
        xml.extend_from_slice(b"</root>");

        // Sequential pass
        let mut sequential = Builder::with_data(xml.clone());
        let mut seq_ranges = Vec::new();
        for i in 0..20 {
            seq_ranges.push(sequential.locate("/root/item", i).unwrap());
        }
        let seq_tokens = sequential.stats().tokens;

        // Independent cold scans
        let mut cold = Builder::with_data(xml);
        let mut cold_tokens = 0;
        for i in (0..20).rev() {
            // Reverse order defeats both the cache key reuse and the
            // sequential cursor
            cold.clear_cache();
            let range = cold.locate("/root/item", i).unwrap();
            assert_eq!(seq_ranges[i as usize], range);
            cold_tokens = cold.stats().tokens;
        }

        assert!(seq_tokens < cold_tokens);
    }

    #[test]
    fn test_sequential_matches_cold_ranges() {
        let data = b"<r><a>1</a><a>2</a><a>3</a></r>";
        let mut sequential = Builder::with_data(data as &[u8]);
        for i in 0..3 {
            let range = sequential.locate("/r/a", i).unwrap();
            let mut fresh = Builder::with_data(data as &[u8]);
            assert_eq!(fresh.locate("/r/a", i).unwrap(), range);
        }
    }

    #[test]
    fn test_non_consecutive_index_is_cold_scan() {
        let data = b"<r><a>1</a><a>2</a><a>3</a></r>";
        let mut builder = Builder::with_data(data as &[u8]);
        builder.locate("/r/a", 0).unwrap();
        let jump = builder.locate("/r/a", 2).unwrap();
        assert_eq!(jump.slice(data), b"<a>3</a>");
    }

    #[test]
    fn test_different_path_is_cold_scan() {
        let data = b"<r><a>1</a><b>2</b></r>";
        let mut builder = Builder::with_data(data as &[u8]);
        builder.locate("/r/a", 0).unwrap();
        let range = builder.locate("/r/b", 0).unwrap();
        assert_eq!(range.slice(data), b"<b>2</b>");
    }

    #[test]
    fn test_set_data_discards_derived_state() {
        let mut builder = Builder::with_data(ITEMS);
        builder.locate("/root/item", 0).unwrap();
        builder.set_data(b"<root><item id=\"new\" larger=\"yes\"/></root>" as &[u8]);
        assert_eq!(
            builder.find("/root/item", 0).unwrap(),
            b"<item id=\"new\" larger=\"yes\"/>"
        );
        assert!(builder.last_error().is_none());
    }

    #[test]
    fn test_build_document() {
        let mut builder = Builder::with_data(ITEMS);
        let doc = builder.build("/root/item", 1).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(doc.name(root), Some("item"));
        assert_eq!(doc.attribute(root, "id"), Some("2"));
        assert_eq!(doc.source_len(), b"<item id=\"2\"/>".len());
    }

    #[test]
    fn test_build_sequential_like_reference_driver() {
        let mut xml = Vec::from(&b"<root><operators>"[..]);
        for i in 0..50 {
            xml.extend_from_slice(format!("<operator id=\"{}\"/>", i).as_bytes());
        }
        xml.extend_from_slice(b"</operators></root>");

        let mut builder = Builder::with_data(xml);
        for i in 0..50 {
            let doc = builder.build("/root/operators/operator", i).unwrap();
            let root = doc.root_element().unwrap();
            assert_eq!(doc.attribute(root, "id"), Some(i.to_string().as_str()));
        }
        assert_eq!(
            builder.build("/root/operators/operator", 50).unwrap_err(),
            Error::StartElementNotFound
        );
    }

    #[test]
    fn test_failed_resolution_leaves_cache_untouched() {
        let mut builder = Builder::with_data(ITEMS);
        builder.locate("/root/item", 0).unwrap();
        let _ = builder.locate("/root/item", 5);
        // The earlier entry still answers without a new scan
        let scans = builder.stats().scans;
        builder.locate("/root/item", 0).unwrap();
        assert_eq!(builder.stats().scans, scans);
    }
}
