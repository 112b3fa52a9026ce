#![doc = include_str!("../README.md")]

use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::{value_parser, ArgAction, Args};
use tshpp_diagnostics::{default_log_file_name, DiagnosticsConfig};

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used,
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self.verbose as i8 - self.quiet as i8 {
            ..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            2.. => LevelFilter::TRACE,
        }
    }
}

/// How diagnostics are shown and saved
#[derive(Debug, Clone, Args)]
pub struct DiagnosticsArgs {
    /// Never color diagnostics, even on a capable terminal
    #[clap(long)]
    no_color: bool,
    /// Also write every diagnostic to a log file.
    ///
    /// Without a path, the log goes to a time stamped file in the current directory.
    #[clap(long, value_name = "log file")]
    log_file: Option<Option<PathBuf>>,
    /// Print a summary of all diagnostics when done
    #[clap(long)]
    summary: bool,
    /// List every recorded diagnostic in the summary
    #[clap(long, requires = "summary")]
    details: bool,
}

impl DiagnosticsArgs {
    /// The diagnostics configuration these flags ask for, as of `now`
    pub fn config(&self, now: DateTime<Local>) -> DiagnosticsConfig {
        let mut config = DiagnosticsConfig::default();
        if self.no_color {
            config.colors = false;
        }
        config.log_file = match &self.log_file {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(default_log_file_name(now)),
            None => None,
        };
        config
    }

    pub fn summary(&self) -> bool {
        self.summary
    }

    pub fn details(&self) -> bool {
        self.details
    }
}
