//! File mode: parse and evaluate one whole source file against a fresh
//! global environment, then exit. Unlike the REPL, there is no persistent
//! session: one file, one environment, one result.

use std::path::Path;

use mica_eval::{eval_program, Environment, Value};
use mica_par::Parser;

use crate::error::{CliError, Result};

pub fn run(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| CliError::ReadSource(path.to_path_buf(), e))?;

    let mut parser = Parser::from_source(&source);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(CliError::Parse(parser.errors().to_vec()));
    }

    let result = eval_program(&program, &Environment::new());
    if let Value::Error(message) = &result {
        return Err(CliError::Eval(message.to_string()));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(source: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        file
    }

    #[test]
    fn evaluates_a_well_formed_file() {
        let file = write_source("let a = 5; let b = a * 2; b + 1;");
        let result = run(file.path()).unwrap();
        assert_eq!(result.inspect(), "11");
    }

    #[test]
    fn parser_errors_short_circuit_evaluation() {
        let file = write_source("let = ;");
        let err = run(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
    }

    #[test]
    fn runtime_errors_surface_as_eval_errors() {
        let file = write_source("5 + true;");
        let err = run(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Eval(_)));
    }

    #[test]
    fn missing_file_surfaces_as_read_source_error() {
        let err = run(Path::new("/nonexistent/path/does-not-exist.mica")).unwrap_err();
        assert!(matches!(err, CliError::ReadSource(_, _)));
    }
}
