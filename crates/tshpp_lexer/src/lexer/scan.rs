//! Identifiers, reserved words, numbers and punctuation

use super::{Lexer, MAX_NUMBER_LEN};
use tshpp_diagnostics::Severity;
use tshpp_tokens::codec::{self, Utf8Char};
use tshpp_tokens::{reserved, Token, TokenKind, TokenValue};

impl Lexer<'_> {
    /// Scans one token. Whitespace has been skipped and the input is not empty.
    pub(super) fn scan_token(&mut self) -> Token {
        let Some(c) = self.decode_current() else {
            let byte = self.advance_byte();
            let (line, column) = (self.position.start_line, self.position.start_column);
            self.report(
                Severity::Error,
                line,
                column,
                "Unexpected character",
                Some(&format!("Byte 0x{byte:02x} is not valid UTF-8")),
            );
            return self.error_token("Unexpected character");
        };
        self.advance_char(c);

        if codec::is_identifier_char(c.codepoint(), true) {
            return self.scan_identifier();
        }
        if codec::is_digit(c.codepoint()) {
            return self.scan_number();
        }

        let kind = match c.to_char() {
            Some('(') => TokenKind::LParen,
            Some(')') => TokenKind::RParen,
            Some('[') => TokenKind::LBracket,
            Some(']') => TokenKind::RBracket,
            Some(':') => TokenKind::Colon,
            Some(';') => TokenKind::SemiColon,
            Some(',') => TokenKind::Comma,
            Some('.') => TokenKind::Dot,
            Some('+') => TokenKind::Plus,
            Some('-') => TokenKind::Minus,
            Some('*') => TokenKind::Star,
            Some('/') => TokenKind::Slash,
            Some('%') => TokenKind::Percent,
            Some('^') => TokenKind::Caret,
            Some('~') => TokenKind::Tilde,
            Some('!') => self.either(b'=', TokenKind::Neq, TokenKind::Bang),
            Some('=') => self.either(b'=', TokenKind::Eq, TokenKind::Assign),
            Some('<') => self.either(b'=', TokenKind::Lte, TokenKind::Lt),
            Some('>') => self.either(b'=', TokenKind::Gte, TokenKind::Gt),
            Some('&') => self.either(b'&', TokenKind::And, TokenKind::BitwiseAnd),
            Some('|') => self.either(b'|', TokenKind::Or, TokenKind::BitwiseOr),
            Some('"') => return self.scan_string(),
            Some('\'') => return self.scan_char(),
            _ => return self.unexpected(c),
        };
        self.make_token(kind, TokenValue::None)
    }

    fn either(&mut self, second: u8, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.match_byte(second) {
            double
        } else {
            single
        }
    }

    fn unexpected(&mut self, c: Utf8Char) -> Token {
        let (line, column) = (self.position.start_line, self.position.start_column);
        let shown = c.to_char().unwrap_or(char::REPLACEMENT_CHARACTER);
        self.report(
            Severity::Error,
            line,
            column,
            "Unexpected character",
            Some(&format!("Remove '{}'", shown.escape_debug())),
        );
        self.error_token("Unexpected character")
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.decode_current() {
            if !codec::is_identifier_char(c.codepoint(), false) {
                break;
            }
            self.advance_char(c);
        }

        let text =
            String::from_utf8_lossy(&self.source[self.position.start..self.position.current])
                .into_owned();
        match reserved::kind_of(&text) {
            Some(kind) => self.make_token(kind, TokenValue::None),
            None => self.make_token(TokenKind::Identifier, TokenValue::Str(text)),
        }
    }

    /// Decimal integers. A fractional part is accepted and dropped with a warning.
    fn scan_number(&mut self) -> Token {
        while self.peek_byte().is_ascii_digit() {
            self.advance_byte();
        }
        let integer_end = self.position.current;

        if self.peek_byte() == b'.' && self.peek_next_byte().is_ascii_digit() {
            self.advance_byte();
            while self.peek_byte().is_ascii_digit() {
                self.advance_byte();
            }
            let (line, column) = (self.position.line, self.position.column);
            self.report(
                Severity::Warning,
                line,
                column,
                "Floating-point numbers are not fully supported yet",
                Some("Truncating to integer value"),
            );
        }

        if self.position.current - self.position.start >= MAX_NUMBER_LEN {
            let (line, column) = (self.position.start_line, self.position.start_column);
            self.report(
                Severity::Error,
                line,
                column,
                "Number too large",
                Some(&format!(
                    "Number literals must be shorter than {MAX_NUMBER_LEN} characters"
                )),
            );
            return self.error_token("Number too large");
        }

        let max = self.target.max_word_value();
        let mut value: i64 = 0;
        let mut saturated = false;
        for &digit in &self.source[self.position.start..integer_end] {
            match value
                .checked_mul(10)
                .and_then(|v| v.checked_add((digit - b'0') as i64))
            {
                Some(next) if next <= max => value = next,
                _ => {
                    value = max;
                    saturated = true;
                    break;
                }
            }
        }
        if saturated {
            let (line, column) = (self.position.start_line, self.position.start_column);
            let bits = self.target.word_size() * 8;
            self.report(
                Severity::Warning,
                line,
                column,
                format!("Integer literal does not fit in a {bits}-bit word"),
                Some(&format!("Saturating to {max}")),
            );
        }

        self.make_token(TokenKind::Number, TokenValue::Integer(value))
    }
}
