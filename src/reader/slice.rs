//! Slice reader - pull events from a byte slice
//!
//! Wraps the tokenizer and lifts raw tokens into `XmlEvent`s, parsing
//! attributes for start/empty tags on the way. Borrows stay tied to the
//! input slice.

use super::events::{ElementEnd, ElementStart, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};

/// Pull-event reader over a byte slice.
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a reader at the start of the input.
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Get the next event, or `None` on malformed markup.
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        loop {
            let token = self.tokenizer.next_token()?;

            match token.kind {
                TokenKind::Eof => return Some(XmlEvent::EndDocument),

                TokenKind::StartTag => {
                    let attrs = self.tag_attributes(&token);
                    let name = token.name?;
                    return Some(XmlEvent::StartElement(ElementStart {
                        name,
                        attributes: attrs,
                    }));
                }

                TokenKind::EmptyTag => {
                    let attrs = self.tag_attributes(&token);
                    let name = token.name?;
                    return Some(XmlEvent::EmptyElement(ElementStart {
                        name,
                        attributes: attrs,
                    }));
                }

                TokenKind::EndTag => {
                    let name = token.name?;
                    return Some(XmlEvent::EndElement(ElementEnd { name }));
                }

                TokenKind::Text => {
                    if let Some(content) = token.content {
                        if !content.is_empty() {
                            return Some(XmlEvent::Text(content));
                        }
                    }
                }

                TokenKind::CData => {
                    if let Some(content) = token.content {
                        return Some(XmlEvent::CData(content));
                    }
                }

                TokenKind::Comment => {
                    if let Some(content) = token.content {
                        return Some(XmlEvent::Comment(content));
                    }
                }

                TokenKind::ProcessingInstruction => {
                    if let Some(target) = token.name {
                        return Some(XmlEvent::ProcessingInstruction {
                            target,
                            data: token.content,
                        });
                    }
                }

                TokenKind::XmlDeclaration => return Some(XmlEvent::Declaration),

                TokenKind::DocType => return Some(XmlEvent::DocType),
            }
        }
    }

    /// Extract and parse the attribute region of a tag token.
    fn tag_attributes(&self, token: &Token<'a>) -> Vec<crate::core::attributes::Attribute<'a>> {
        let (start, end) = token.span;
        let tag = &self.input[start..end];

        // Skip '<' and the element name
        let mut pos = 1;
        while pos < tag.len() {
            match tag[pos] {
                b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/' => break,
                _ => pos += 1,
            }
        }

        // Drop the trailing '>' or '/>'
        let mut attr_end = tag.len();
        if tag.ends_with(b"/>") {
            attr_end -= 2;
        } else if tag.ends_with(b">") {
            attr_end -= 1;
        }

        if pos >= attr_end {
            return Vec::new();
        }

        parse_attributes(&tag[pos..attr_end])
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event()? {
            XmlEvent::EndDocument => None,
            event => Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events: Vec<_> = SliceReader::new(b"<root>hello</root>").collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], XmlEvent::StartElement(e) if e.name_str() == Some("root")));
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], XmlEvent::EndElement(e) if e.name_str() == Some("root")));
    }

    #[test]
    fn test_empty_element_attributes() {
        let events: Vec<_> = SliceReader::new(b"<div id=\"main\" class=\"box\"/>").collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            XmlEvent::EmptyElement(e) => {
                assert_eq!(e.attribute("id"), Some("main"));
                assert_eq!(e.attribute("class"), Some("box"));
            }
            other => panic!("expected EmptyElement, got {:?}", other),
        }
    }

    #[test]
    fn test_cdata() {
        let events: Vec<_> = SliceReader::new(b"<s><![CDATA[a<b]]></s>").collect();
        assert!(matches!(&events[1], XmlEvent::CData(c) if c.as_ref() == b"a<b"));
    }

    #[test]
    fn test_comment_skippable() {
        let events: Vec<_> = SliceReader::new(b"<r><!-- note --></r>").collect();
        assert!(events.iter().any(|e| matches!(e, XmlEvent::Comment(_))));
    }

    #[test]
    fn test_malformed_ends_iteration() {
        let events: Vec<_> = SliceReader::new(b"<root><item").collect();
        assert_eq!(events.len(), 1);
    }
}
