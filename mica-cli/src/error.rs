//! The driver's own error type, kept deliberately separate from
//! `mica_eval::Value::Error`: this enum is for failures in `mica` itself
//! (bad paths, malformed config, a logging subscriber that refuses to
//! install), not for anything a mica *program* can produce.

use std::path::PathBuf;

use mica_util::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("could not read {0}: {1}")]
    ReadSource(PathBuf, std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("parser errors:\n{}", .0.iter().map(|e| format!("\t{e}")).collect::<Vec<_>>().join("\n"))]
    Parse(Vec<Diagnostic>),

    #[error("{0}")]
    Eval(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
