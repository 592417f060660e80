//! The driver crate: REPL, file execution, logging, and config for the
//! mica scripting language. This is the only crate in the workspace aware
//! of stdin/stdout/process exit codes. `mica-lex`, `mica-par`, and
//! `mica-eval` are pure libraries.

pub mod config;
pub mod error;
pub mod repl;
pub mod run_file;

pub use config::Config;
pub use error::{CliError, Result};
