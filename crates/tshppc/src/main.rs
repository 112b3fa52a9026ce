use std::io;
use std::io::{stderr, stdout, Stderr, StderrLock, Stdout, StdoutLock};
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, trace, Level, Metadata};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::{format, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};
use tshpp_diagnostics::FatalError;

use crate::args::Args;

mod args;
mod driver;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting tshppc with args: {args:?}");
    debug!("tshppc version: {}", env!("CARGO_PKG_VERSION"));

    let mut out = stdout().lock();
    match driver::run(&args, &mut out) {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        // already printed when it was reported
        Err(error) if error.downcast_ref::<FatalError>().is_some() => Ok(ExitCode::FAILURE),
        Err(error) => Err(error),
    }
}

struct StdioWriter {
    stdout: Stdout,
    stderr: Stderr,
}

enum StdioLock<'a> {
    Stdout(StdoutLock<'a>),
    Stderr(StderrLock<'a>),
}

impl<'a> io::Write for StdioLock<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write(buf),
            StdioLock::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.flush(),
            StdioLock::Stderr(stderr) => stderr.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for StdioWriter {
    type Writer = StdioLock<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        StdioLock::Stderr(self.stderr.lock())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        // errors and warnings go next to the echoed diagnostics
        if meta.level() <= &Level::WARN {
            StdioLock::Stderr(self.stderr.lock())
        } else {
            StdioLock::Stdout(self.stdout.lock())
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().without_time())
                .with_writer(StdioWriter {
                    stdout: stdout(),
                    stderr: stderr(),
                })
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
