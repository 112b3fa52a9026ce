//! Text forms of diagnostics and run summaries

use crate::{Diagnostic, Severity};
use owo_colors::{OwoColorize, Style};
use std::fmt::{Display, Formatter, Write};
use std::path::Path;

/// Renders a diagnostic the way it is shown to the user.
///
/// ```text
/// Error [Lexical] in main.ћпп:3:7: Unterminated string literal
///   Suggestion: Add closing double quote
/// ```
///
/// Debug builds also show where in the compiler the diagnostic came from.
pub fn render(diagnostic: &Diagnostic, colors: bool) -> String {
    let header = format!(
        "{} [{}] in {}:{}:{}: {}",
        diagnostic.severity(),
        diagnostic.category(),
        file_name(diagnostic.file()),
        diagnostic.line(),
        diagnostic.column(),
        diagnostic.message()
    );
    let mut out = String::new();
    if colors {
        let _ = write!(out, "{}", header.style(severity_style(diagnostic.severity())));
    } else {
        out.push_str(&header);
    }

    if let Some(suggestion) = diagnostic.suggestion() {
        out.push('\n');
        if colors {
            let _ = write!(out, "  {} {}", "Suggestion:".cyan(), suggestion);
        } else {
            let _ = write!(out, "  Suggestion: {}", suggestion);
        }
    }

    if cfg!(debug_assertions) {
        let from = diagnostic.reported_from();
        let label = "Reported from:";
        out.push('\n');
        if colors {
            let _ = write!(out, "  {} ", label.blue());
        } else {
            let _ = write!(out, "  {label} ");
        }
        let _ = write!(out, "{}:{}", file_name(from.file()), from.line());
    }
    out
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Warning => Style::new().bold().yellow(),
        Severity::Error => Style::new().bold().red(),
        Severity::Fatal => Style::new().bold().magenta(),
    }
}

/// Only the final component of a path is shown
fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Counts of diagnostics at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub warnings: usize,
    pub errors: usize,
    pub fatal: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Compilation Summary ===")?;
        writeln!(f, "Total issues: {}", self.total)?;
        writeln!(f, "  Warnings: {}", self.warnings)?;
        writeln!(f, "  Errors:   {}", self.errors)?;
        write!(f, "  Fatal:    {}", self.fatal)
    }
}
