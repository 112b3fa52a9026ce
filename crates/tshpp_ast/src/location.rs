//! Source locations of nodes

use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Where a node starts in its source file.
///
/// The file name is shared between every node from the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub filename: Option<Arc<str>>,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32, filename: Option<Arc<str>>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// A location without a file
    pub fn at(line: u32, column: u32) -> Self {
        Self::new(line, column, None)
    }

    /// The file name, or `<unknown>`
    pub fn file(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unknown>")
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file(), self.line, self.column)
    }
}
