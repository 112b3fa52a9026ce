//! the args for running tshppc

use std::path::{Path, PathBuf};

use tshpp_cli_common::{DiagnosticsArgs, LoggingArgs};
use tshpp_common::TargetArch;

/// Extension every ћ++ source file should have
pub const SOURCE_EXTENSION: &str = "ћпп";

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Compiles ћ++ source files")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(flatten)]
    diagnostics: DiagnosticsArgs,

    /// The source file to compile
    #[clap(
        value_name = "source file",
        value_hint = clap::ValueHint::FilePath,
        required_unless_present = "keywords"
    )]
    pub file: Option<PathBuf>,
    /// Target architecture, which bounds integer literals. Defaults to this machine
    #[clap(long, value_name = "arch", env = "TSHPP_TARGET")]
    pub target: Option<TargetArch>,
    /// Print every token of the source file
    #[clap(long)]
    pub dump_tokens: bool,
    /// List the reserved words and exit
    #[clap(long)]
    pub keywords: bool,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    pub fn diagnostics(&self) -> &DiagnosticsArgs {
        &self.diagnostics
    }
}

/// Whether a path names a ћ++ source file
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use test_log::test;

    #[test]
    fn test_args_parsing() {
        let test = "tshppc програм.ћпп --dump-tokens";
        let args = Args::try_parse_from(test.split(" ")).expect("could not parse test string");
        assert_eq!(args.file.as_deref(), Some(Path::new("програм.ћпп")));
        assert!(args.dump_tokens);
        assert!(!args.keywords);
    }

    #[test]
    fn test_target_parsing() {
        let args = Args::try_parse_from(["tshppc", "--target", "x86", "a.ћпп"]).unwrap();
        assert_eq!(args.target, Some(TargetArch::X86));
        assert!(Args::try_parse_from(["tshppc", "--target", "arm", "a.ћпп"]).is_err());
    }

    #[test]
    fn test_file_required() {
        assert!(Args::try_parse_from(["tshppc"]).is_err());
        let args = Args::try_parse_from(["tshppc", "--keywords"]).unwrap();
        assert!(args.file.is_none());
    }

    #[test]
    fn test_source_extension() {
        assert!(is_source_file(Path::new("dir/програм.ћпп")));
        assert!(!is_source_file(Path::new("програм.c")));
        assert!(!is_source_file(Path::new("ћпп")));
    }
}
