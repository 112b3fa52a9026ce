//! Responsible for converting ћ++ source bytes into a token stream

use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, error, trace};
use tshpp_common::TargetInfo;
use tshpp_diagnostics::{Category, Diagnostic, Diagnostics, FatalError, Severity};
use tshpp_tokens::codec::{self, Utf8Char};
use tshpp_tokens::{Token, TokenKind, TokenValue};

mod literals;
mod scan;

/// Numbers with a lexeme this long or longer are rejected
pub const MAX_NUMBER_LEN: usize = 64;

/// Where the lexer is in its source.
///
/// Captured and restored as a whole when peeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset of the next unread byte
    pub current: usize,
    /// Byte offset of the first byte of the token being scanned
    pub start: usize,
    pub line: u32,
    /// Counted in bytes
    pub column: u32,
    /// Column the previous line ended at
    pub previous_column: u32,
    pub start_line: u32,
    pub start_column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            current: 0,
            start: 0,
            line: 1,
            column: 1,
            previous_column: 1,
            start_line: 1,
            start_column: 1,
        }
    }
}

/// The ћ++ lexer.
///
/// Owns a copy of the whole source with a trailing NUL so that looking one byte
/// past the end is always safe. Diagnostics go to the context of the current run.
#[derive(Debug)]
pub struct Lexer<'d> {
    source: Vec<u8>,
    len: usize,
    filename: String,
    target: TargetInfo,
    position: Position,
    /// A peeked token, and where the lexer ends up once it is consumed
    lookahead: Option<(Token, Position)>,
    diagnostics: &'d mut Diagnostics,
    finished: bool,
}

impl<'d> Lexer<'d> {
    /// Creates a new lexer over in-memory source
    pub fn new(
        source: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        target: TargetInfo,
        diagnostics: &'d mut Diagnostics,
    ) -> Self {
        let mut source = source.into();
        let len = source.len();
        source.push(0);
        let filename = filename.into();
        debug!(
            "created lexer for {filename} ({len} bytes, target {})",
            target.arch()
        );
        Self {
            source,
            len,
            filename,
            target,
            position: Position::default(),
            lookahead: None,
            diagnostics,
            finished: false,
        }
    }

    /// Reads all of `reader` and creates a lexer over it.
    ///
    /// A read failure is reported as a fatal diagnostic.
    pub fn from_reader<R: Read>(
        mut reader: R,
        filename: impl Into<String>,
        target: TargetInfo,
        diagnostics: &'d mut Diagnostics,
    ) -> Result<Self, FatalError> {
        let filename = filename.into();
        let mut source = vec![];
        if let Err(e) = reader.read_to_end(&mut source) {
            return Err(fatal_io(
                diagnostics,
                &filename,
                "Failed to read entire source file",
                "Check file for corruption or disk errors",
                e,
            ));
        }
        Ok(Self::new(source, filename, target, diagnostics))
    }

    /// Opens and reads a source file
    pub fn open(
        path: impl AsRef<Path>,
        target: TargetInfo,
        diagnostics: &'d mut Diagnostics,
    ) -> Result<Self, FatalError> {
        let path = path.as_ref();
        let filename = path.display().to_string();
        match File::open(path) {
            Ok(file) => Self::from_reader(file, filename, target, diagnostics),
            Err(e) => Err(fatal_io(
                diagnostics,
                &filename,
                "Failed to open source file",
                "Check that the file exists and has read permissions",
                e,
            )),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn target(&self) -> &TargetInfo {
        &self.target
    }

    /// The current position
    pub fn position(&self) -> Position {
        self.position
    }

    /// The diagnostics reported so far in this run
    pub fn diagnostics(&self) -> &Diagnostics {
        &*self.diagnostics
    }

    /// Gets the next token, consuming it
    pub fn next_token(&mut self) -> Token {
        if let Some((token, after)) = self.lookahead.take() {
            trace!("using buffered lookahead {token}");
            self.position = after;
            return token;
        }
        self.scan()
    }

    /// Gets the next token without consuming it.
    ///
    /// The lexer position is left untouched. Peeking again returns the same
    /// token, and the next call to [`next_token`](Self::next_token) returns it.
    pub fn peek_token(&mut self) -> &Token {
        let buffered = match self.lookahead.take() {
            Some(buffered) => buffered,
            None => {
                let saved = self.position;
                let token = self.scan();
                let after = self.position;
                self.position = saved;
                trace!("buffered lookahead {token}");
                (token, after)
            }
        };
        &self.lookahead.insert(buffered).0
    }

    /// Lexes the rest of the input up to and including either the end of input or
    /// the first error token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = vec![];
        loop {
            let token = self.next_token();
            let stop = token.is_eof() || token.is_error();
            tokens.push(token);
            if stop {
                break;
            }
        }
        tokens
    }

    /// Writes every remaining token to `out`, numbered, stopping at the end of
    /// input or the first error. Returns how many tokens were written.
    pub fn print_all_tokens<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        writeln!(out, "Tokens in {}:", self.filename)?;
        let tokens = self.tokenize();
        for (index, token) in tokens.iter().enumerate() {
            writeln!(out, "{:4}: {token}", index + 1)?;
        }
        if tokens.last().is_some_and(|token| token.is_error()) {
            writeln!(out, "Lexing stopped at the first error.")?;
        }
        writeln!(out, "Total tokens: {}", tokens.len())?;
        Ok(tokens.len())
    }

    fn scan(&mut self) -> Token {
        self.skip_whitespace();
        self.position.start = self.position.current;
        self.position.start_line = self.position.line;
        self.position.start_column = self.position.column;
        let token = if self.is_at_end() {
            self.make_token(TokenKind::Eof, TokenValue::None)
        } else {
            self.scan_token()
        };
        trace!("scanned {token}");
        token
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek_byte() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance_byte();
                }
                b'/' if self.peek_next_byte() == b'/' => {
                    while !self.is_at_end() && self.peek_byte() != b'\n' {
                        self.advance_byte();
                    }
                }
                b'/' if self.peek_next_byte() == b'*' => {
                    let (line, column) = (self.position.line, self.position.column);
                    self.advance_byte();
                    self.advance_byte();
                    loop {
                        if self.is_at_end() {
                            self.report(
                                Severity::Warning,
                                line,
                                column,
                                "Unterminated multi-line comment",
                                Some("Add */ to close the comment"),
                            );
                            break;
                        }
                        if self.peek_byte() == b'*' && self.peek_next_byte() == b'/' {
                            self.advance_byte();
                            self.advance_byte();
                            break;
                        }
                        self.advance_byte();
                    }
                }
                _ => return,
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.position.current >= self.len
    }

    /// The next byte, NUL at the end
    fn peek_byte(&self) -> u8 {
        self.source[self.position.current.min(self.len)]
    }

    fn peek_next_byte(&self) -> u8 {
        if self.position.current + 1 >= self.len {
            0
        } else {
            self.source[self.position.current + 1]
        }
    }

    /// Consumes one byte, keeping line and column up to date
    fn advance_byte(&mut self) -> u8 {
        if self.is_at_end() {
            return 0;
        }
        let byte = self.source[self.position.current];
        self.position.current += 1;
        if byte == b'\n' {
            self.position.previous_column = self.position.column;
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        byte
    }

    /// Consumes every byte of `c`
    fn advance_char(&mut self, c: Utf8Char) {
        for _ in 0..c.len() {
            self.advance_byte();
        }
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek_byte() != expected {
            return false;
        }
        self.advance_byte();
        true
    }

    /// Decodes the character at the current position
    fn decode_current(&self) -> Option<Utf8Char> {
        codec::decode(&self.source[self.position.current..self.len])
    }

    /// A token spanning from the start of the current token to here
    fn make_token(&self, kind: TokenKind, value: TokenValue) -> Token {
        Token::new(
            kind,
            &self.source[self.position.start..self.position.current],
            self.position.start_line,
            self.position.start_column,
            value,
        )
    }

    fn error_token(&self, message: impl Into<String>) -> Token {
        Token::error(message, self.position.line, self.position.column)
    }

    #[track_caller]
    fn report(
        &mut self,
        severity: Severity,
        line: u32,
        column: u32,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        let mut diagnostic =
            Diagnostic::new(Category::Lexical, severity, message).at(&self.filename, line, column);
        if let Some(suggestion) = suggestion {
            diagnostic = diagnostic.with_suggestion(suggestion);
        }
        if let Err(fatal) = self.diagnostics.report(diagnostic) {
            error!("lexical diagnostic escalated to fatal: {fatal}");
        }
    }
}

fn fatal_io(
    diagnostics: &mut Diagnostics,
    filename: &str,
    message: &str,
    suggestion: &str,
    cause: io::Error,
) -> FatalError {
    debug!("io failure on {filename}: {cause}");
    let diagnostic = Diagnostic::fatal(Category::Io, format!("{message}: {cause}"))
        .at(filename, 0, 0)
        .with_suggestion(suggestion);
    let fatal = FatalError::from(&diagnostic);
    match diagnostics.report(diagnostic) {
        Err(reported) => reported,
        Ok(()) => fatal,
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token including the final EOF, then stops
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tshpp_common::TargetArch;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let mut diagnostics = Diagnostics::quiet();
        Lexer::new(source, "test.ћпп", TargetInfo::host(), &mut diagnostics)
            .map(|token| token.kind())
            .collect()
    }

    #[test]
    fn empty_input_is_eof() {
        assert_eq!(lex_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(lex_kinds("  \n\t\r\n "), vec![TokenKind::Eof]);
    }

    #[test]
    fn eof_repeats() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("x", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        assert_eq!(lexer.next_token().kind(), TokenKind::Identifier);
        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            lex_kinds("// line\nx /* block\n over lines */ y // trailing"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment_warns() {
        let mut diagnostics = Diagnostics::quiet();
        let kinds = Lexer::new("x /* never closed", "test.ћпп", TargetInfo::host(), &mut diagnostics)
            .map(|token| token.kind())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(diagnostics.warnings(), 1);
        assert_eq!(diagnostics.errors(), 0);
        let warning = diagnostics.iter().next().unwrap();
        assert_eq!(warning.message(), "Unterminated multi-line comment");
        assert_eq!(warning.suggestion(), Some("Add */ to close the comment"));
        assert_eq!((warning.line(), warning.column()), (1, 3));
    }

    #[test]
    fn positions_are_one_based_bytes() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("ако x\n  y", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        let reserved = lexer.next_token();
        assert_eq!((reserved.line(), reserved.column()), (1, 1));
        assert_eq!(reserved.len(), 6);
        let x = lexer.next_token();
        // six bytes of `ако` and a space
        assert_eq!((x.line(), x.column()), (1, 8));
        let y = lexer.next_token();
        assert_eq!((y.line(), y.column()), (2, 3));
        assert_eq!(lexer.position().previous_column, 9);
    }

    #[test]
    fn peek_does_not_move() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("a  b", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        let before = lexer.position();
        let peeked = lexer.peek_token().clone();
        assert_eq!(lexer.position(), before);
        assert_eq!(lexer.peek_token(), &peeked);
        assert_eq!(lexer.position(), before);
        assert_eq!(lexer.next_token(), peeked);
        assert_eq!(lexer.next_token().str(), Some("b"));
    }

    #[test]
    fn peeked_errors_are_reported_once() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("\"abc", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        assert!(lexer.peek_token().is_error());
        assert!(lexer.peek_token().is_error());
        assert!(lexer.next_token().is_error());
        assert_eq!(lexer.diagnostics().errors(), 1);
    }

    #[test]
    fn tokenize_stops_at_error() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("a # b", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].lexeme(), "Unexpected character");
    }

    #[test]
    fn print_all_tokens_numbers_each_token() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::new("x = 1;", "test.ћпп", TargetInfo::host(), &mut diagnostics);
        let mut out = vec![];
        let count = lexer.print_all_tokens(&mut out).unwrap();
        assert_eq!(count, 5);
        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Tokens in test.ћпп:");
        assert_eq!(
            lines[3],
            r#"   3: Token { type: NUMBER, lexeme: "1", line: 1, col: 5, value: 1 }"#
        );
        assert_eq!(lines.last(), Some(&"Total tokens: 5"));
    }

    #[test]
    fn reads_from_reader() {
        let mut diagnostics = Diagnostics::quiet();
        let mut lexer = Lexer::from_reader(
            "док".as_bytes(),
            "reader.ћпп",
            TargetInfo::new(TargetArch::X86),
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(lexer.next_token().kind(), TokenKind::While);
        assert_eq!(lexer.target().word_size(), 4);
    }

    #[test]
    fn read_failure_is_fatal() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }

        let mut diagnostics = Diagnostics::quiet();
        let err = Lexer::from_reader(Failing, "broken.ћпп", TargetInfo::host(), &mut diagnostics)
            .unwrap_err();
        assert_eq!(err.category, Category::Io);
        assert_eq!(diagnostics.count(Severity::Fatal), 1);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagnostics = Diagnostics::quiet();
        let result = Lexer::open(
            dir.path().join("missing.ћпп"),
            TargetInfo::host(),
            &mut diagnostics,
        );
        assert!(result.is_err());
        let fatal = diagnostics.iter().next().unwrap();
        assert!(fatal.message().starts_with("Failed to open source file"));
    }
}
