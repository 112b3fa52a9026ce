#![doc = include_str!("../README.md")]

pub mod stack;
pub mod target;

pub use stack::ensure_sufficient_stack;
pub use target::{TargetArch, TargetInfo, UnknownTargetError};
