//! The per-run diagnostics context

use crate::render::{render, Summary};
use crate::{Diagnostic, FatalError, Severity, MAX_RECORDED};
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::{env, io};
use tracing::{debug, error, warn};

/// How a [`Diagnostics`] context behaves
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    /// Use ANSI colors when echoing
    pub colors: bool,
    /// Echo each diagnostic to stderr as it is reported
    pub echo: bool,
    /// Also append every diagnostic to this file
    pub log_file: Option<PathBuf>,
    /// Stop recording after this many diagnostics
    pub max_recorded: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            colors: colors_for_term(env::var("TERM").ok().as_deref()),
            echo: true,
            log_file: None,
            max_recorded: MAX_RECORDED,
        }
    }
}

impl DiagnosticsConfig {
    /// A config that records but never prints. Used by tests and tools that
    /// inspect diagnostics themselves.
    pub fn quiet() -> Self {
        Self {
            colors: false,
            echo: false,
            ..Default::default()
        }
    }
}

/// Whether a terminal with the given `TERM` value should get colors
pub fn colors_for_term(term: Option<&str>) -> bool {
    matches!(term, Some(term) if term != "dumb")
}

/// The log file name used when none is given, stamped with the run's start time
pub fn default_log_file_name(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("ћпп_error_log_{}.txt", now.format("%Y%m%d_%H%M%S")))
}

/// Collects the diagnostics of one compilation run
#[derive(Debug)]
pub struct Diagnostics {
    config: DiagnosticsConfig,
    recorded: Vec<Diagnostic>,
    dropped: usize,
    log: Option<BufWriter<File>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a context with the default config and no log file
    pub fn new() -> Self {
        Self {
            config: DiagnosticsConfig::default(),
            recorded: vec![],
            dropped: 0,
            log: None,
        }
    }

    /// Creates a context that never prints
    pub fn quiet() -> Self {
        Self {
            config: DiagnosticsConfig::quiet(),
            recorded: vec![],
            dropped: 0,
            log: None,
        }
    }

    /// Creates a context from a config, creating the log file if one is requested
    pub fn with_config(config: DiagnosticsConfig) -> io::Result<Self> {
        let log = match &config.log_file {
            Some(path) => Some(open_log(path)?),
            None => None,
        };
        Ok(Self {
            config,
            recorded: vec![],
            dropped: 0,
            log,
        })
    }

    /// Records a diagnostic.
    ///
    /// Diagnostics that are not echoed are logged at their own level instead.
    /// Fatal diagnostics are recorded and echoed like any other and then returned
    /// as an error, which the caller must propagate.
    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<(), FatalError> {
        if self.config.echo {
            debug!(
                category = %diagnostic.category(),
                severity = %diagnostic.severity(),
                "{}:{}:{}: {}",
                diagnostic.file(),
                diagnostic.line(),
                diagnostic.column(),
                diagnostic.message()
            );
        } else {
            match diagnostic.severity() {
                Severity::Warning => warn!(
                    category = %diagnostic.category(),
                    "{}:{}:{}: {}",
                    diagnostic.file(),
                    diagnostic.line(),
                    diagnostic.column(),
                    diagnostic.message()
                ),
                Severity::Error | Severity::Fatal => error!(
                    category = %diagnostic.category(),
                    severity = %diagnostic.severity(),
                    "{}:{}:{}: {}",
                    diagnostic.file(),
                    diagnostic.line(),
                    diagnostic.column(),
                    diagnostic.message()
                ),
            }
        }

        let fatal = diagnostic.severity() == Severity::Fatal;
        if self.recorded.len() >= self.config.max_recorded {
            if self.dropped == 0 {
                if self.config.echo {
                    eprintln!("Too many errors, stopping error tracking.");
                } else {
                    warn!("Too many errors, stopping error tracking.");
                }
            }
            self.dropped += 1;
            return if fatal {
                Err(FatalError::from(&diagnostic))
            } else {
                Ok(())
            };
        }

        if self.config.echo {
            eprintln!("{}", render(&diagnostic, self.config.colors));
        }
        self.log_line(&render(&diagnostic, false));

        let result = if fatal {
            Err(FatalError::from(&diagnostic))
        } else {
            Ok(())
        };
        self.recorded.push(diagnostic);
        result
    }

    /// All recorded diagnostics, in the order they were reported
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.recorded.iter()
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    /// Reports that arrived after the recording limit was hit
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of recorded diagnostics of one severity
    pub fn count(&self, severity: Severity) -> usize {
        self.recorded
            .iter()
            .filter(|diagnostic| diagnostic.severity() == severity)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Whether anything worse than a warning was recorded
    pub fn has_errors(&self) -> bool {
        self.recorded
            .iter()
            .any(|diagnostic| diagnostic.severity() >= Severity::Error)
    }

    /// Forgets everything recorded so far
    pub fn clear(&mut self) {
        self.recorded.clear();
        self.dropped = 0;
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.len(),
            warnings: self.warnings(),
            errors: self.errors(),
            fatal: self.count(Severity::Fatal),
        }
    }

    /// Writes the summary, and with `verbose` every recorded diagnostic again, to
    /// `out` and the log file.
    pub fn print_summary<W: Write>(&mut self, out: &mut W, verbose: bool) -> io::Result<()> {
        let summary = self.summary();
        writeln!(out, "\n{summary}")?;
        self.log_line(&format!("\n{summary}"));
        if verbose && !self.recorded.is_empty() {
            writeln!(out, "\n=== Error Details ===")?;
            for diagnostic in &self.recorded {
                writeln!(out, "{}", render(diagnostic, self.config.colors))?;
            }
        }
        Ok(())
    }

    fn log_line(&mut self, line: &str) {
        if let Some(log) = &mut self.log {
            if let Err(e) = writeln!(log, "{line}").and_then(|_| log.flush()) {
                warn!("could not write to the error log: {e}");
            }
        }
    }
}

fn open_log(path: &Path) -> io::Result<BufWriter<File>> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "ћ++ Compiler Error Log")?;
    writeln!(file, "====================")?;
    writeln!(file, "Date: {}\n", Local::now().format("%a %b %e %H:%M:%S %Y"))?;
    file.flush()?;
    debug!("logging diagnostics to {path:?}");
    Ok(file)
}
