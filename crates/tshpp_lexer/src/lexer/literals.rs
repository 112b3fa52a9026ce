//! String and character literals

use super::Lexer;
use tshpp_diagnostics::Severity;
use tshpp_tokens::codec;
use tshpp_tokens::{Token, TokenKind, TokenValue};

/// Why an escape sequence could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EscapeError {
    /// input ended right after the backslash
    Eof,
    Hex,
    Unicode,
    Unknown(char),
}

impl Lexer<'_> {
    /// Reads the escape after a backslash. `\'` is only valid when `quote` is `'`.
    fn scan_escape(&mut self, quote: u8) -> Result<char, EscapeError> {
        if self.is_at_end() {
            return Err(EscapeError::Eof);
        }
        let Some(c) = self.decode_current() else {
            self.advance_byte();
            return Err(EscapeError::Unknown(char::REPLACEMENT_CHARACTER));
        };
        self.advance_char(c);
        let escaped = match c.to_char().unwrap_or(char::REPLACEMENT_CHARACTER) {
            '"' => '"',
            '\'' if quote == b'\'' => '\'',
            '\\' => '\\',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'a' => '\u{07}',
            'x' => {
                let value = self.scan_hex_digits(2).ok_or(EscapeError::Hex)?;
                char::from(value as u8)
            }
            'u' => self
                .scan_hex_digits(4)
                .and_then(char::from_u32)
                .ok_or(EscapeError::Unicode)?,
            other => return Err(EscapeError::Unknown(other)),
        };
        Ok(escaped)
    }

    /// Exactly `count` hex digits
    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let digit = (self.peek_byte() as char).to_digit(16)?;
            self.advance_byte();
            value = value * 16 + digit;
        }
        Some(value)
    }

    /// Reports a bad escape and skips the rest of the literal.
    ///
    /// Scanning does not resume right after the bad escape. The remainder of the
    /// literal up to its closing quote is discarded, so a literal yields exactly one
    /// error token and the next token starts after the literal.
    fn escape_failure(&mut self, error: EscapeError, quote: u8) -> Token {
        let (line, column) = (self.position.line, self.position.column);
        let (start_line, start_column) = (self.position.start_line, self.position.start_column);
        let message = match error {
            EscapeError::Eof => return self.unterminated(quote),
            EscapeError::Hex => {
                self.report(
                    Severity::Error,
                    start_line,
                    start_column,
                    "Invalid hex escape sequence",
                    Some("Hex escape must be in the form \\xXX"),
                );
                "Invalid hex escape".to_string()
            }
            EscapeError::Unicode => {
                self.report(
                    Severity::Error,
                    start_line,
                    start_column,
                    "Invalid Unicode escape sequence",
                    Some("Unicode escape must be in the form \\uXXXX and name a valid character"),
                );
                "Invalid Unicode escape".to_string()
            }
            EscapeError::Unknown(c) => {
                let message = format!("Invalid escape sequence '\\{c}'");
                self.report(
                    Severity::Error,
                    line,
                    column,
                    message.clone(),
                    Some("Use a valid escape sequence (\\n, \\t, etc.)"),
                );
                message
            }
        };
        self.skip_literal(quote);
        Token::error(message, line, column)
    }

    /// Skips to just past the closing quote. Character literals never span lines.
    fn skip_literal(&mut self, quote: u8) {
        while !self.is_at_end() {
            match self.peek_byte() {
                b'\\' => {
                    self.advance_byte();
                    self.advance_byte();
                }
                b'\n' if quote == b'\'' => return,
                byte => {
                    self.advance_byte();
                    if byte == quote {
                        return;
                    }
                }
            }
        }
    }

    fn unterminated(&mut self, quote: u8) -> Token {
        let (line, column) = (self.position.start_line, self.position.start_column);
        if quote == b'"' {
            self.report(
                Severity::Error,
                line,
                column,
                "Unterminated string literal",
                Some("Add closing double quote"),
            );
            self.error_token("Unterminated string")
        } else {
            self.report(
                Severity::Error,
                line,
                column,
                "Unterminated character literal",
                Some("Add closing single quote"),
            );
            self.error_token("Unterminated character literal")
        }
    }

    /// Reports malformed UTF-8 inside a literal and skips the rest of it
    fn invalid_utf8(&mut self, message: &str, quote: u8) -> Token {
        let (line, column) = (self.position.line, self.position.column);
        let (start_line, start_column) = (self.position.start_line, self.position.start_column);
        self.report(
            Severity::Error,
            start_line,
            start_column,
            message,
            Some("Character must be valid UTF-8"),
        );
        self.skip_literal(quote);
        Token::error(message, line, column)
    }

    /// After the opening `"`
    pub(super) fn scan_string(&mut self) -> Token {
        let mut buffer = String::new();
        loop {
            if self.is_at_end() {
                return self.unterminated(b'"');
            }
            match self.peek_byte() {
                b'"' => {
                    self.advance_byte();
                    break;
                }
                b'\\' => {
                    self.advance_byte();
                    match self.scan_escape(b'"') {
                        Ok(c) => buffer.push(c),
                        Err(e) => return self.escape_failure(e, b'"'),
                    }
                }
                _ => match self.decode_current() {
                    Some(c) => {
                        self.advance_char(c);
                        buffer.push(c.to_char().unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    None => {
                        self.advance_byte();
                        return self.invalid_utf8("Invalid UTF-8 character", b'"');
                    }
                },
            }
        }
        self.make_token(TokenKind::String, TokenValue::Str(buffer))
    }

    /// After the opening `'`
    pub(super) fn scan_char(&mut self) -> Token {
        if self.is_at_end() {
            return self.unterminated(b'\'');
        }
        let c = match self.peek_byte() {
            b'\'' => {
                self.advance_byte();
                let (line, column) = (self.position.start_line, self.position.start_column);
                self.report(
                    Severity::Error,
                    line,
                    column,
                    "Empty character literal",
                    Some("Put exactly one character between the quotes"),
                );
                return self.error_token("Empty character literal");
            }
            b'\\' => {
                self.advance_byte();
                match self.scan_escape(b'\'') {
                    Ok(c) => c,
                    Err(e) => return self.escape_failure(e, b'\''),
                }
            }
            lead if lead.is_ascii() => {
                self.advance_byte();
                lead as char
            }
            lead => match self.scan_multibyte(lead) {
                Ok(c) => c,
                Err(message) => return self.invalid_utf8(message, b'\''),
            },
        };

        if self.is_at_end() || self.peek_byte() != b'\'' {
            let token = self.unterminated(b'\'');
            self.skip_literal(b'\'');
            return token;
        }
        self.advance_byte();
        self.make_token(TokenKind::CharLiteral, TokenValue::Char(c))
    }

    /// A raw multi-byte character inside a character literal. Each way it can be
    /// malformed gets its own message.
    fn scan_multibyte(&mut self, lead: u8) -> Result<char, &'static str> {
        let Some(len) = codec::sequence_len(lead) else {
            self.advance_byte();
            return Err("Invalid UTF-8 character");
        };
        let current = self.position.current;
        for offset in 1..len {
            if current + offset >= self.len {
                self.advance_byte();
                return Err("Incomplete UTF-8 character");
            }
            if self.source[current + offset] & 0xC0 != 0x80 {
                self.advance_byte();
                return Err("Invalid UTF-8 continuation byte");
            }
        }
        match self.decode_current() {
            Some(c) => {
                self.advance_char(c);
                Ok(c.to_char().unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            None => {
                self.advance_byte();
                Err("Invalid UTF-8 character")
            }
        }
    }
}
