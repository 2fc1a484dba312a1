//! `supdef`: a thin CLI binary layered over the `supdef_core` library.
//!
//! This binary owns every OS-facing concern — argument parsing, logging
//! backend, stdin/stdout — so the library stays free of them.

mod cli;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use supdef_core::config::{Configuration, DEFAULT_CMDLINE};
use supdef_core::error::SupDefError;

fn init_logger(debug: bool) {
    let mut builder = env_logger::Builder::new();
    let default_level = if debug { LevelFilter::Debug } else { LevelFilter::Warn };
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

/// Eagerly validate what `Configuration::new` alone cannot: that `--cc`
/// actually resolves to a file, in addition to the `--cc-cmdline`
/// placeholder check it already performs.
fn validate_cli(cli: &Cli) -> supdef_core::error::Result<()> {
    if !cli.cc.is_file() {
        return Err(SupDefError::Config {
            reason: format!("compiler executable not found: {}", cli.cc.display()),
        });
    }
    Configuration::validate_cmdline(&cli.cc_cmdline)
}

/// Build a [`Configuration`] from CLI arguments, falling back to the
/// default compiler path and command template on a soft validation failure,
/// per §4.10: interactively unless `--non-interactive` was passed. Declining
/// the fallback propagates the original [`SupDefError::Config`] as fatal.
fn build_configuration(cli: &Cli) -> supdef_core::error::Result<Configuration> {
    match validate_cli(cli) {
        Ok(()) => Configuration::new(
            cli.include.clone(),
            cli.cc.clone(),
            cli.cc_cmdline.clone(),
            cli.debug,
        ),
        Err(SupDefError::Config { reason }) => {
            log::warn!("invalid compiler configuration: {reason}");
            if !cli.non_interactive && !confirm_fallback(&reason) {
                return Err(SupDefError::Config { reason });
            }
            log::warn!("falling back to the default compiler path and command template");
            Configuration::new(
                cli.include.clone(),
                PathBuf::from("cc"),
                DEFAULT_CMDLINE.to_string(),
                cli.debug,
            )
        }
        Err(other) => Err(other),
    }
}

fn confirm_fallback(reason: &str) -> bool {
    eprint!(
        "warning: {reason}\nfall back to the default compiler configuration? [Y/n] "
    );
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return true;
    }
    !answer.trim().eq_ignore_ascii_case("n")
}

fn run(cli: Cli) -> supdef_core::error::Result<String> {
    let max_stages = cli.max_stages;
    let config = build_configuration(&cli)?;
    supdef_core::preprocess_file(&cli.input, &config, max_stages)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.debug);

    let output_path = cli.output.clone();
    match run(cli) {
        Ok(text) => {
            let result = match output_path {
                Some(path) => std::fs::write(&path, text),
                None => io::stdout().write_all(text.as_bytes()),
            };
            if let Err(e) = result {
                log::error!("failed to write output: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
