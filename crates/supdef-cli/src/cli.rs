//! Command-line argument definitions for the `supdef` binary.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// A C/C++ source-level macro preprocessor with compiled-and-run macro support.
#[derive(Debug, Parser)]
#[command(name = "supdef", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Input file to preprocess.
    pub input: PathBuf,

    /// Destination file (stdout if omitted).
    #[arg(short = 'o', long = "output", alias = "output-file")]
    pub output: Option<PathBuf>,

    /// Directory to search for `import` targets; repeatable, prepended in given order.
    #[arg(short = 'I', long = "include")]
    pub include: Vec<PathBuf>,

    /// Enable verbose tracing.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Compiler executable invoked by runnable macros.
    #[arg(long = "cc", env = "SUPDEF_CC", default_value = "cc")]
    pub cc: PathBuf,

    /// Compiler command-line template (must contain `#CC#`, `#IN#`, `#OUT#`).
    #[arg(long = "cc-cmdline", default_value_t = supdef_core::config::DEFAULT_CMDLINE.to_string())]
    pub cc_cmdline: String,

    /// Skip the confirmation prompt for a bad `--cc`/`--cc-cmdline`, always
    /// falling back to the default.
    #[arg(short = 'y', long = "non-interactive")]
    pub non_interactive: bool,

    /// Defensive cap on expansion stages (off by default); not part of the
    /// observable contract for a document that terminates on its own.
    #[arg(long = "max-stages")]
    pub max_stages: Option<usize>,

    /// Print version and exit.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["supdef", "main.sd"]);
        assert_eq!(cli.input, PathBuf::from("main.sd"));
        assert!(cli.output.is_none());
        assert!(cli.include.is_empty());
        assert!(!cli.debug);
        assert!(cli.max_stages.is_none());
    }

    #[test]
    fn parses_repeated_include_and_output() {
        let cli = Cli::parse_from([
            "supdef", "-I", "a", "-I", "b", "-o", "out.c", "-d", "main.sd",
        ]);
        assert_eq!(cli.include, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.output, Some(PathBuf::from("out.c")));
        assert!(cli.debug);
    }

    #[test]
    fn non_interactive_flag_parses() {
        let cli = Cli::parse_from(["supdef", "-y", "main.sd"]);
        assert!(cli.non_interactive);
    }

    #[test]
    fn max_stages_parses() {
        let cli = Cli::parse_from(["supdef", "--max-stages", "16", "main.sd"]);
        assert_eq!(cli.max_stages, Some(16));
    }

    #[test]
    fn lowercase_v_is_the_version_flag() {
        let err = Cli::try_parse_from(["supdef", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
