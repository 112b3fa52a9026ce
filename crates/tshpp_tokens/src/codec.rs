//! UTF-8 decoding and encoding on raw bytes.
//!
//! Source files are handled as bytes so that malformed input can be reported
//! with a position instead of being rejected up front. Decoding is strict:
//! overlong forms, surrogates and anything past U+10FFFF are malformed.

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

/// Largest valid codepoint
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// A single character along with its encoded form
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Utf8Char {
    codepoint: u32,
    len: u8,
    bytes: [u8; 4],
}

impl Utf8Char {
    /// The scalar value
    pub fn codepoint(&self) -> u32 {
        self.codepoint
    }

    /// Number of bytes in the encoded form, 1 to 4
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// The encoded form
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The character, if the codepoint is a valid scalar value
    pub fn to_char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

impl Debug for Utf8Char {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "U+{:04X} {:02x?}", self.codepoint, self.as_bytes())
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Number of bytes a sequence starting with `lead` claims to have
pub fn sequence_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Decodes the character at the start of `bytes`.
///
/// Returns `None` for empty, truncated or malformed input. Callers scanning a
/// buffer should step over a single byte when this fails.
pub fn decode(bytes: &[u8]) -> Option<Utf8Char> {
    let lead = *bytes.first()?;
    let len = sequence_len(lead)?;
    let mut codepoint = match len {
        1 => lead as u32,
        2 => (lead & 0x1F) as u32,
        3 => (lead & 0x0F) as u32,
        _ => (lead & 0x07) as u32,
    };
    let sequence = bytes.get(..len)?;
    for &byte in &sequence[1..] {
        if !is_continuation(byte) {
            return None;
        }
        codepoint = (codepoint << 6) | (byte & 0x3F) as u32;
    }

    let overlong = matches!(
        (len, codepoint),
        (2, 0..=0x7F) | (3, 0..=0x7FF) | (4, 0..=0xFFFF)
    );
    if overlong || codepoint > MAX_CODEPOINT || (0xD800..=0xDFFF).contains(&codepoint) {
        return None;
    }

    let mut out = [0; 4];
    out[..len].copy_from_slice(sequence);
    Some(Utf8Char {
        codepoint,
        len: len as u8,
        bytes: out,
    })
}

/// Encodes a codepoint in its shortest form.
///
/// Only values above [`MAX_CODEPOINT`] fail. Surrogates get their three byte
/// form even though [`decode`] will refuse it.
pub fn encode(codepoint: u32) -> Option<Utf8Char> {
    let mut bytes = [0; 4];
    let len = match codepoint {
        0..=0x7F => {
            bytes[0] = codepoint as u8;
            1
        }
        0x80..=0x7FF => {
            bytes[0] = 0xC0 | (codepoint >> 6) as u8;
            bytes[1] = 0x80 | (codepoint & 0x3F) as u8;
            2
        }
        0x800..=0xFFFF => {
            bytes[0] = 0xE0 | (codepoint >> 12) as u8;
            bytes[1] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            bytes[2] = 0x80 | (codepoint & 0x3F) as u8;
            3
        }
        0x10000..=MAX_CODEPOINT => {
            bytes[0] = 0xF0 | (codepoint >> 18) as u8;
            bytes[1] = 0x80 | ((codepoint >> 12) & 0x3F) as u8;
            bytes[2] = 0x80 | ((codepoint >> 6) & 0x3F) as u8;
            bytes[3] = 0x80 | (codepoint & 0x3F) as u8;
            4
        }
        _ => return None,
    };
    Some(Utf8Char {
        codepoint,
        len,
        bytes,
    })
}

/// Iterator over the characters of a byte string, skipping malformed bytes
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Chars<'a> {
    type Item = Utf8Char;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            match decode(self.rest) {
                Some(c) => {
                    self.rest = &self.rest[c.len()..];
                    return Some(c);
                }
                None => self.rest = &self.rest[1..],
            }
        }
        None
    }
}

/// The characters of `bytes`
pub fn chars(bytes: &[u8]) -> Chars<'_> {
    Chars { rest: bytes }
}

/// Number of characters in `bytes`, not counting malformed bytes
pub fn char_count(bytes: &[u8]) -> usize {
    chars(bytes).count()
}

/// Compares two byte strings character by character
pub fn compare(left: &[u8], right: &[u8]) -> Ordering {
    chars(left)
        .map(|c| c.codepoint)
        .cmp(chars(right).map(|c| c.codepoint))
}

/// ASCII letters and the Cyrillic block, which contains every Serbian letter
pub fn is_alphabetic(codepoint: u32) -> bool {
    matches!(codepoint, 0x41..=0x5A | 0x61..=0x7A | 0x0400..=0x04FF)
}

/// Only ASCII digits count
pub fn is_digit(codepoint: u32) -> bool {
    matches!(codepoint, 0x30..=0x39)
}

pub fn is_alphanumeric(codepoint: u32) -> bool {
    is_alphabetic(codepoint) || is_digit(codepoint)
}

/// Whether a character may appear in an identifier, `is_start` being true for
/// the first character
pub fn is_identifier_char(codepoint: u32, is_start: bool) -> bool {
    if codepoint == '_' as u32 {
        return true;
    }
    if is_digit(codepoint) {
        return !is_start;
    }
    is_alphabetic(codepoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn decode_each_length() {
        let a = decode(b"a").unwrap();
        assert_eq!((a.codepoint(), a.len()), (0x61, 1));
        let je = decode("ј".as_bytes()).unwrap();
        assert_eq!((je.codepoint(), je.len()), (0x0458, 2));
        let euro = decode("€x".as_bytes()).unwrap();
        assert_eq!((euro.codepoint(), euro.len()), (0x20AC, 3));
        let emoji = decode("😀".as_bytes()).unwrap();
        assert_eq!((emoji.codepoint(), emoji.len()), (0x1F600, 4));
        assert_eq!(emoji.as_bytes(), "😀".as_bytes());
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(decode(b""), None);
        // stray continuation byte
        assert_eq!(decode(&[0x80]), None);
        // invalid lead bytes
        assert_eq!(decode(&[0xF8, 0x80, 0x80, 0x80]), None);
        assert_eq!(decode(&[0xFF]), None);
        // truncated
        assert_eq!(decode(&[0xD1]), None);
        assert_eq!(decode(&[0xE2, 0x82]), None);
        // bad continuation
        assert_eq!(decode(&[0xD1, 0x41]), None);
    }

    #[test]
    fn decode_rejects_overlong() {
        assert_eq!(decode(&[0xC0, 0x80]), None);
        assert_eq!(decode(&[0xC1, 0xBF]), None);
        assert_eq!(decode(&[0xE0, 0x9F, 0xBF]), None);
        assert_eq!(decode(&[0xF0, 0x8F, 0xBF, 0xBF]), None);
    }

    #[test]
    fn decode_rejects_surrogates_and_out_of_range() {
        assert_eq!(decode(&[0xED, 0xA0, 0x80]), None);
        assert_eq!(decode(&[0xED, 0xBF, 0xBF]), None);
        assert_eq!(decode(&[0xF4, 0x90, 0x80, 0x80]), None);
        assert!(decode(&[0xF4, 0x8F, 0xBF, 0xBF]).is_some());
    }

    #[test]
    fn encode_matches_std() {
        for c in ['\0', 'a', '~', 'ћ', 'Џ', '€', '\u{FFFF}', '😀', char::MAX] {
            let encoded = encode(c as u32).unwrap();
            let mut buffer = [0; 4];
            assert_eq!(encoded.as_bytes(), c.encode_utf8(&mut buffer).as_bytes());
        }
        assert_eq!(encode(MAX_CODEPOINT + 1), None);
        assert_eq!(encode(0xD800).map(|c| c.len()), Some(3));
    }

    #[test]
    fn every_scalar_value_round_trips() {
        for codepoint in (0..=MAX_CODEPOINT).filter(|cp| !(0xD800..=0xDFFF).contains(cp)) {
            let encoded = encode(codepoint).unwrap();
            let decoded = decode(encoded.as_bytes()).unwrap();
            assert_eq!(decoded.codepoint(), codepoint);
            assert_eq!(decoded.len(), char::from_u32(codepoint).unwrap().len_utf8());
        }
    }

    #[test]
    fn counting_skips_malformed_bytes() {
        assert_eq!(char_count("променљива".as_bytes()), 10);
        assert_eq!(char_count(&[b'a', 0xFF, b'b']), 2);
        assert_eq!(char_count(b""), 0);
    }

    #[test]
    fn comparison_is_by_codepoint() {
        assert_eq!(compare("ако".as_bytes(), "ако".as_bytes()), Ordering::Equal);
        assert_eq!(compare("ак".as_bytes(), "ако".as_bytes()), Ordering::Less);
        assert_eq!(compare("б".as_bytes(), "а".as_bytes()), Ordering::Greater);
        assert_eq!(compare(&[0xFF, b'x'], b"x"), Ordering::Equal);
    }

    #[test]
    fn character_classes() {
        assert!(is_alphabetic('Z' as u32));
        assert!(is_alphabetic('ћ' as u32));
        assert!(is_alphabetic('ђ' as u32));
        assert!(is_alphabetic('џ' as u32));
        assert!(!is_alphabetic('_' as u32));
        assert!(!is_alphabetic('λ' as u32));
        assert!(is_digit('7' as u32));
        assert!(!is_digit('٣' as u32));
        assert!(is_alphanumeric('ш' as u32));
    }

    #[test]
    fn identifier_characters() {
        assert!(is_identifier_char('_' as u32, true));
        assert!(is_identifier_char('_' as u32, false));
        assert!(!is_identifier_char('1' as u32, true));
        assert!(is_identifier_char('1' as u32, false));
        assert!(is_identifier_char('б' as u32, true));
        assert!(!is_identifier_char('-' as u32, false));
        assert!(!is_identifier_char(' ' as u32, false));
    }
}
