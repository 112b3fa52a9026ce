#![doc = include_str!("../README.md")]

mod lexer;

pub use lexer::{Lexer, Position, MAX_NUMBER_LEN};
pub use tshpp_tokens::{Token, TokenKind, TokenValue};
