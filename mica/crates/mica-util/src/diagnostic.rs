use std::fmt;

use crate::span::Span;

/// How serious a [`Diagnostic`] is.
///
/// mica only ever reports `Error`s today (see the parser's `errors()` list
/// in `mica-par`), but `Warning` exists so a future lint pass has somewhere
/// to put its findings without a breaking change to this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single human-readable problem report, pointing at a span of source text.
///
/// Diagnostics are data, not `Result::Err`. The lexer and parser never stop
/// at the first one; they record it here and keep going so a single `mica`
/// invocation can report every problem it finds in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.span.line, self.span.column, self.severity, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_with_position_and_severity() {
        let d = Diagnostic::error("unexpected token", Span::new(4, 5, 1, 5));
        assert_eq!(d.to_string(), "1:5: error: unexpected token");
    }
}
