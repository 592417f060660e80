//! `mica` - the driver binary for the mica scripting language.
//!
//! With no file argument, starts an interactive REPL. With one file
//! argument, parses and evaluates that file against a fresh global
//! environment, then exits.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mica_cli::{config::Config, error::CliError, repl, run_file};

/// mica - a small C-like scripting language
#[derive(ClapParser, Debug)]
#[command(name = "mica")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the mica scripting language", long_about = None)]
struct Cli {
    /// Source file to run; omit to start the REPL
    file: Option<PathBuf>,

    /// Raise the log level to debug
    #[arg(short, long, global = true, env = "MICA_VERBOSE")]
    verbose: bool,

    /// Disable ANSI color in log output
    #[arg(long, global = true, env = "MICA_NO_COLOR")]
    no_color: bool,

    /// Path to a config file (defaults to ./mica.toml or the user config dir)
    #[arg(long, global = true, env = "MICA_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let no_color = cli.no_color || config.no_color;

    if let Err(e) = init_logging(cli.verbose, no_color) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match cli.file {
        Some(path) => run_file_mode(&path),
        None => run_repl_mode(),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, CliError> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<(), CliError> {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))
    }
    .map_err(|e| CliError::Logging(e.to_string()))?;

    let layer = fmt::layer().with_ansi(!no_color).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

fn run_file_mode(path: &std::path::Path) -> ExitCode {
    match run_file::run(path) {
        Ok(value) => {
            tracing::debug!(result = %value.inspect(), "evaluation finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_repl_mode() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match repl::run(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
