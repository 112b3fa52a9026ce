#![doc = include_str!("../README.md")]

pub mod build;
pub mod location;
pub mod node;
pub mod print;
pub mod types;
pub mod visitor;

pub use build::{AstBuilder, AstError, AstResult};
pub use location::SourceLocation;
pub use node::{Node, NodeKind};
pub use types::TypeDescriptor;
pub use visitor::{Visitor, VisitorMut};
