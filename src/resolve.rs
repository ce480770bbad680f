//! Tag-path resolver
//!
//! One forward pass over the token stream that locates the byte range of
//! the element named by a tag path and sibling index. Two depth counters
//! drive the match:
//!
//! - `level`: how deep the candidate match has gotten into the path;
//!   bumped only when a path segment matches at the right depth.
//! - `global_level`: absolute element nesting depth; bumped on every
//!   start tag and dropped on every end tag.
//!
//! A start tag only continues the match while `level == global_level`,
//! which rejects sibling subtrees of matched ancestors without any
//! explicit skipping. Intermediate segments match their first occurrence
//! only; only the leaf segment honors the sibling index.

use crate::builder::ScanStats;
use crate::core::tokenizer::{TokenKind, Tokenizer};
use crate::error::Error;
use crate::range::ByteRange;
use memchr::memchr;

/// Resumable scanner position, carried between sequential resolutions.
///
/// `pos` sits just past the previous match's closing tag; `last_offset`
/// is the end offset of the last token consumed, which becomes the start
/// boundary of the next match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub pos: usize,
    pub last_offset: usize,
}

/// Scan the token stream for the element named by `segments` and
/// `sibling_index`.
///
/// With a `resume` cursor the scan continues mid-buffer (the caller
/// passes the single leaf segment and index 0); otherwise it starts at
/// the buffer start. Returns the matched range and the cursor positioned
/// just past it.
pub(crate) fn scan(
    data: &[u8],
    segments: &[String],
    sibling_index: u32,
    resume: Option<Cursor>,
    stats: &mut ScanStats,
) -> Result<(ByteRange, Cursor), Error> {
    stats.scans += 1;

    let (mut tokenizer, mut last_offset) = match resume {
        Some(cursor) => (Tokenizer::resume_at(data, cursor.pos), cursor.last_offset),
        None => (Tokenizer::new(data), 0),
    };

    // Head of the not-yet-matched path segments
    let mut next = 0usize;
    let mut remaining_index = sibling_index;

    // Depth counters restart at zero for every scan, including resumed
    // ones; a resumed scan treats its start position as depth zero.
    let mut level: i64 = 0;
    let mut global_level: i64 = 0;

    let mut start_found = false;
    let mut start_offset = 0usize;

    loop {
        let Some(token) = tokenizer.next_token() else {
            break;
        };
        stats.tokens += 1;

        match token.kind {
            TokenKind::Eof => break,

            TokenKind::StartTag => {
                if !start_found {
                    if let Some(name) = token.name {
                        if level == global_level && segment_matches(&segments[next], name) {
                            if next + 1 == segments.len() {
                                if remaining_index > 0 {
                                    // Not the wanted occurrence: skip its
                                    // subtree like any unmatched branch
                                    remaining_index -= 1;
                                    level -= 1;
                                } else {
                                    start_offset = last_offset;
                                    start_found = true;
                                }
                            } else {
                                next += 1;
                            }
                            level += 1;
                        }
                    }
                }
                global_level += 1;
            }

            TokenKind::EndTag => {
                if start_found {
                    if let Some(name) = token.name {
                        if level == global_level
                            && segment_matches(&segments[segments.len() - 1], name)
                        {
                            let end = token.span.1;
                            return Ok((
                                ByteRange::new(start_offset, end),
                                Cursor {
                                    pos: tokenizer.position(),
                                    last_offset: end,
                                },
                            ));
                        }
                    }
                }
                global_level -= 1;
            }

            TokenKind::EmptyTag => {
                // A single token standing for a start immediately followed
                // by its end; both depth counters net out unchanged.
                if !start_found {
                    if let Some(name) = token.name {
                        if level == global_level && segment_matches(&segments[next], name) {
                            if next + 1 == segments.len() {
                                if remaining_index > 0 {
                                    remaining_index -= 1;
                                } else {
                                    let end = token.span.1;
                                    return Ok((
                                        ByteRange::new(last_offset, end),
                                        Cursor {
                                            pos: tokenizer.position(),
                                            last_offset: end,
                                        },
                                    ));
                                }
                            } else {
                                // An empty element has no children to
                                // descend into, but the segment is still
                                // consumed: intermediate segments match
                                // their first occurrence only.
                                next += 1;
                                level += 1;
                            }
                        }
                    }
                }
            }

            _ => {}
        }

        last_offset = token.span.1;
    }

    if start_found {
        Err(Error::EndElementNotFound)
    } else {
        Err(Error::StartElementNotFound)
    }
}

/// Compare a path segment against a tag name, ignoring any namespace
/// prefix on the tag.
#[inline]
fn segment_matches(segment: &str, name: &[u8]) -> bool {
    let local = match memchr(b':', name) {
        Some(colon) => &name[colon + 1..],
        None => name,
    };
    segment.as_bytes() == local
}
