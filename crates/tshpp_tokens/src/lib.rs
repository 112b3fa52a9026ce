#![doc = include_str!("../README.md")]

pub mod codec;
pub mod reserved;
pub mod token;

pub use token::{Token, TokenKind, TokenValue};
