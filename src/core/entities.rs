//! XML entity decoding
//!
//! Built-in named entities (&lt; &gt; &amp; &quot; &apos;) and numeric
//! character references (&#123; &#x7B;). Unknown entities are left as-is.
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references.
///
/// Returns `Borrowed` if no entities are present (zero-copy), `Owned`
/// otherwise.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input.
pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        match memchr(b'&', &input[pos..]) {
            Some(amp_offset) => {
                result.extend_from_slice(&input[pos..pos + amp_offset]);
                pos += amp_offset;

                if let Some(semi_offset) = memchr(b';', &input[pos..]) {
                    let entity = &input[pos + 1..pos + semi_offset];
                    if let Some(decoded) = decode_entity(entity) {
                        result.extend_from_slice(decoded.as_bytes());
                        pos += semi_offset + 1;
                        continue;
                    }
                }

                // No semicolon or unknown entity: keep the ampersand
                result.push(b'&');
                pos += 1;
            }
            None => {
                result.extend_from_slice(&input[pos..]);
                break;
            }
        }
    }

    result
}

/// Decode a single entity body (without '&' and ';').
fn decode_entity(entity: &[u8]) -> Option<String> {
    if entity.is_empty() {
        return None;
    }

    if entity[0] == b'#' {
        return decode_numeric_entity(&entity[1..]);
    }

    match entity {
        b"lt" => Some("<".to_string()),
        b"gt" => Some(">".to_string()),
        b"amp" => Some("&".to_string()),
        b"quot" => Some("\"".to_string()),
        b"apos" => Some("'".to_string()),
        _ => None,
    }
}

/// Decode a numeric character reference body (without '&#' and ';').
fn decode_numeric_entity(digits: &[u8]) -> Option<String> {
    let code = if digits.first() == Some(&b'x') || digits.first() == Some(&b'X') {
        u32::from_str_radix(std::str::from_utf8(&digits[1..]).ok()?, 16).ok()?
    } else {
        std::str::from_utf8(digits).ok()?.parse::<u32>().ok()?
    };

    char::from_u32(code).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_borrows() {
        let decoded = decode_text(b"plain text");
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded.as_ref(), b"plain text");
    }

    #[test]
    fn test_named_entities() {
        assert_eq!(
            decode_text(b"&lt;a&gt; &amp; &quot;b&quot; &apos;c&apos;").as_ref(),
            b"<a> & \"b\" 'c'"
        );
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_text(b"&#65;&#x42;").as_ref(), b"AB");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_text(b"&unknown; x").as_ref(), b"&unknown; x");
    }

    #[test]
    fn test_bare_ampersand_kept() {
        assert_eq!(decode_text(b"a & b").as_ref(), b"a & b");
    }
}
