//! Runs the compiler over one source file

use std::io::Write;

use chrono::Local;
use eyre::eyre;
use tracing::debug;
use tshpp_common::TargetInfo;
use tshpp_diagnostics::{Category, Diagnostic, Diagnostics};
use tshpp_lexer::Lexer;
use tshpp_tokens::reserved::reserved_words;

use crate::args::{is_source_file, Args};

/// Runs everything `args` asks for, writing normal output to `out`.
///
/// Returns whether the run finished without errors. A fatal diagnostic has
/// already been printed when it comes back as an `Err`.
pub fn run<W: Write>(args: &Args, out: &mut W) -> eyre::Result<bool> {
    if args.keywords {
        list_keywords(out)?;
        return Ok(true);
    }
    let file = args
        .file
        .as_deref()
        .ok_or_else(|| eyre!("no input file specified"))?;

    let config = args.diagnostics().config(Local::now());
    let mut diagnostics = Diagnostics::with_config(config)?;
    let target = args.target.map(TargetInfo::new).unwrap_or_default();
    debug!("compiling {file:?} for {}", target.arch());

    if !is_source_file(file) {
        diagnostics.report(
            Diagnostic::warning(Category::Io, "Input file does not have .ћпп extension")
                .at(file.display().to_string(), 0, 0)
                .with_suggestion("Rename the file to end in .ћпп"),
        )?;
    }

    writeln!(out, "ћ++ compiler: processing file {}", file.display())?;
    {
        let mut lexer = Lexer::open(file, target, &mut diagnostics)?;
        if args.dump_tokens {
            lexer.print_all_tokens(out)?;
        } else {
            let tokens = lexer.tokenize();
            debug!("lexed {} tokens from {}", tokens.len(), lexer.filename());
        }
    }

    if args.diagnostics().summary() {
        diagnostics.print_summary(out, args.diagnostics().details())?;
    }

    let succeeded = !diagnostics.has_errors();
    if succeeded {
        writeln!(out, "Compilation successful")?;
    }
    Ok(succeeded)
}

fn list_keywords<W: Write>(out: &mut W) -> eyre::Result<()> {
    for (spelling, kind) in reserved_words() {
        writeln!(out, "{spelling:<10} {}", kind.name())?;
    }
    Ok(())
}
