//! The interactive REPL: read a line, lex it, parse it, evaluate it
//! against a persistent environment, print the result. One session, one
//! environment, so bindings from one line are visible to the next.

use std::io::{self, BufRead, Write};

use mica_eval::{eval_program, Environment};
use mica_par::Parser;
use mica_util::Diagnostic;

pub const PROMPT: &str = ">> ";

/// Drives the REPL loop over `input`/`output`. End-of-input returns
/// cleanly (exit code 0 is the caller's concern, not this function's).
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> io::Result<()> {
    let env = Environment::new();
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        if line.trim().is_empty() {
            continue;
        }

        let mut parser = Parser::from_source(&line);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            print_parser_errors(&mut output, parser.errors())?;
            continue;
        }

        let result = eval_program(&program, &env);
        writeln!(output, "{}", result.inspect())?;
    }
}

fn print_parser_errors<W: Write>(output: &mut W, errors: &[Diagnostic]) -> io::Result<()> {
    writeln!(output, "parser errors:")?;
    for diagnostic in errors {
        writeln!(output, "\t{diagnostic}")?;
    }
    Ok(())
}
