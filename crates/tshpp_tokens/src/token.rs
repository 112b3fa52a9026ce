//! Tokens produced by the lexer

use std::fmt::{Display, Formatter, Write};
use strum::EnumIter;

/// The kind of a token.
///
/// Reserved words sit in their own block at the end of the enum, see
/// [`TokenKind::is_reserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum TokenKind {
    /// End of input, always the last token
    Eof,
    /// A lexing error, the lexeme holds the message
    Error,

    Identifier,
    Number,
    CharLiteral,
    String,

    // operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`, also opens blocks
    Lt,
    /// `<=`
    Lte,
    /// `>`, also closes blocks
    Gt,
    /// `>=`
    Gte,
    /// `&`
    BitwiseAnd,
    /// `&&`
    And,
    /// `|`
    BitwiseOr,
    /// `||`
    Or,
    /// `!`
    Bang,
    /// `^`
    Caret,
    /// `~`
    Tilde,

    // delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `<` once the parser has decided it opens a block. Never produced by the lexer.
    LAngle,
    /// `>` once the parser has decided it closes a block. Never produced by the lexer.
    RAngle,
    SemiColon,
    Comma,
    Dot,
    Colon,

    /// `низ`, the array type. Not a reserved word yet.
    Array,

    // reserved words
    /// `ако`
    If,
    /// `иначе`
    Else,
    /// `док`
    While,
    /// `за`
    For,
    /// `ради`
    Do,
    /// `прекини`
    Break,
    /// `врати`
    Return,
    /// `екстерно`
    External,
    /// `тачно`
    True,
    /// `нетачно`
    False,
}

impl TokenKind {
    /// The name of this kind, used in token dumps and error messages
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "EOF",
            Error => "ERROR",
            Identifier => "IDENTIFIER",
            Number => "NUMBER",
            CharLiteral => "CHAR_LITERAL",
            String => "STRING",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Assign => "=",
            Eq => "==",
            Neq => "!=",
            Lt | LAngle => "<",
            Lte => "<=",
            Gt | RAngle => ">",
            Gte => ">=",
            BitwiseAnd => "&",
            And => "&&",
            BitwiseOr => "|",
            Or => "||",
            Bang => "!",
            Caret => "^",
            Tilde => "~",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            SemiColon => ";",
            Comma => ",",
            Dot => ".",
            Colon => ":",
            Array => "ARRAY",
            If => "IF",
            Else => "ELSE",
            While => "WHILE",
            For => "FOR",
            Do => "DO",
            Break => "BREAK",
            Return => "RETURN",
            External => "EXTERNAL",
            True => "TRUE",
            False => "FALSE",
        }
    }

    /// Whether this kind is one of the reserved words
    pub fn is_reserved(&self) -> bool {
        *self >= TokenKind::If
    }

    /// Whether tokens of this kind carry a [`TokenValue`]
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Number | TokenKind::CharLiteral | TokenKind::String
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The value carried by a token, depending on its kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenValue {
    #[default]
    None,
    /// Numbers
    Integer(i64),
    /// Identifier names and decoded string literals
    Str(String),
    /// Character literals
    Char(char),
}

/// A lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    length: usize,
    line: u32,
    column: u32,
    value: TokenValue,
}

impl Token {
    /// Creates a new token from the bytes it was scanned from
    pub fn new(kind: TokenKind, lexeme: &[u8], line: u32, column: u32, value: TokenValue) -> Self {
        Self {
            kind,
            lexeme: String::from_utf8_lossy(lexeme).into_owned(),
            length: lexeme.len(),
            line,
            column,
            value,
        }
    }

    /// Creates an error token whose lexeme is the message
    pub fn error(message: impl Into<String>, line: u32, column: u32) -> Self {
        let lexeme = message.into();
        Self {
            kind: TokenKind::Error,
            length: lexeme.len(),
            lexeme,
            line,
            column,
            value: TokenValue::None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The source text of this token, or the message of an error token
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Length of the lexeme in source bytes
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 1-based line of the first byte
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the first byte, counted in bytes
    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// The integer value of a number token
    pub fn integer(&self) -> Option<i64> {
        match self.value {
            TokenValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// The name of an identifier or the contents of a string literal
    pub fn str(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The character of a character literal
    pub fn char(&self) -> Option<char> {
        match self.value {
            TokenValue::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

fn escape_into(out: &mut Formatter<'_>, text: &str) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c if (c as u32) < 0x20 => write!(out, "\\x{:02x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Debug dump form:
/// `Token { type: NUMBER, lexeme: "42", line: 1, col: 5, value: 42 }`
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{ type: {}, lexeme: \"", self.kind)?;
        escape_into(f, &self.lexeme)?;
        write!(f, "\", line: {}, col: {}", self.line, self.column)?;
        match (&self.kind, &self.value) {
            (TokenKind::Number, TokenValue::Integer(i)) => write!(f, ", value: {i}")?,
            (TokenKind::String, TokenValue::Str(s)) => write!(f, ", value: \"{s}\"")?,
            (TokenKind::CharLiteral, TokenValue::Char(c)) => {
                if (' '..='~').contains(c) {
                    write!(f, ", value: '{c}'")?
                } else {
                    write!(f, ", value: '\\u{:04x}'", *c as u32)?
                }
            }
            _ => {}
        }
        write!(f, " }}")
    }
}
