#![doc = include_str!("../README.md")]

use std::panic::Location;
use strum::{Display, EnumIter};
use thiserror::Error;

mod diagnostics;
mod render;

pub use diagnostics::{colors_for_term, default_log_file_name, Diagnostics, DiagnosticsConfig};
pub use render::{render, Summary};

/// Most diagnostics a single run records before it stops tracking new ones
pub const MAX_RECORDED: usize = 500;

/// Which stage of the compiler produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Category {
    Lexical,
    Syntax,
    Semantic,
    #[strum(to_string = "CodeGen")]
    CodeGen,
    #[strum(to_string = "IO")]
    Io,
    Internal,
}

/// How bad a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Severity {
    Warning,
    Error,
    /// Compilation can not continue
    #[strum(to_string = "Fatal Error")]
    Fatal,
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    category: Category,
    severity: Severity,
    file: String,
    line: u32,
    column: u32,
    message: String,
    suggestion: Option<String>,
    reported_from: &'static Location<'static>,
}

impl Diagnostic {
    /// Creates a new diagnostic with an unknown source position.
    ///
    /// The location of the caller is remembered as the place in the compiler
    /// that reported it.
    #[track_caller]
    pub fn new(category: Category, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
            message: message.into(),
            suggestion: None,
            reported_from: Location::caller(),
        }
    }

    #[track_caller]
    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Warning, message)
    }

    #[track_caller]
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Error, message)
    }

    #[track_caller]
    pub fn fatal(category: Category, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Fatal, message)
    }

    /// Sets the source position this diagnostic points at
    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self.column = column;
        self
    }

    /// Attaches a hint on how to fix the problem
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Where in the compiler this was reported from
    pub fn reported_from(&self) -> &'static Location<'static> {
        self.reported_from
    }
}

/// A fatal diagnostic was reported. Compilation must stop.
#[derive(Debug, Clone, Error)]
#[error("{category} error in {file}:{line}:{column}: {message}")]
pub struct FatalError {
    pub category: Category,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl From<&Diagnostic> for FatalError {
    fn from(value: &Diagnostic) -> Self {
        Self {
            category: value.category,
            file: value.file.clone(),
            line: value.line,
            column: value.column,
            message: value.message.clone(),
        }
    }
}
