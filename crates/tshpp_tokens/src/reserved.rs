//! The reserved words of ћ++.
//!
//! Lookups compare by codepoint rather than by byte.

use crate::codec;
use crate::token::TokenKind;
use std::cmp::Ordering;

static RESERVED: [(&str, TokenKind); 10] = [
    ("ако", TokenKind::If),
    ("иначе", TokenKind::Else),
    ("док", TokenKind::While),
    ("за", TokenKind::For),
    ("ради", TokenKind::Do),
    ("прекини", TokenKind::Break),
    ("врати", TokenKind::Return),
    ("екстерно", TokenKind::External),
    ("тачно", TokenKind::True),
    ("нетачно", TokenKind::False),
];

/// Every reserved spelling with its kind
pub fn reserved_words() -> impl Iterator<Item = (&'static str, TokenKind)> {
    RESERVED.iter().copied()
}

/// The kind of a reserved word, if `text` is one
pub fn kind_of(text: &str) -> Option<TokenKind> {
    RESERVED
        .iter()
        .find(|(spelling, _)| codec::compare(spelling.as_bytes(), text.as_bytes()) == Ordering::Equal)
        .map(|&(_, kind)| kind)
}

pub fn is_reserved(text: &str) -> bool {
    kind_of(text).is_some()
}

/// How a reserved kind is spelled in source
pub fn spelling_of(kind: TokenKind) -> Option<&'static str> {
    RESERVED
        .iter()
        .find(|&&(_, reserved)| reserved == kind)
        .map(|&(spelling, _)| spelling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_log::test;

    #[test]
    fn lookups_agree() {
        for (spelling, kind) in reserved_words() {
            assert_eq!(kind_of(spelling), Some(kind));
            assert_eq!(spelling_of(kind), Some(spelling));
            assert!(kind.is_reserved());
        }
    }

    #[test]
    fn every_reserved_kind_has_a_spelling() {
        for kind in TokenKind::iter().filter(TokenKind::is_reserved) {
            assert!(spelling_of(kind).is_some(), "{kind} has no spelling");
        }
        assert_eq!(spelling_of(TokenKind::Array), None);
        assert_eq!(spelling_of(TokenKind::Identifier), None);
    }

    #[test]
    fn other_text_is_not_reserved() {
        for text in ["", "ак", "акоо", "Ако", "if", "низ", "функција", "ako"] {
            assert!(!is_reserved(text), "{text:?} should not be reserved");
        }
    }
}
