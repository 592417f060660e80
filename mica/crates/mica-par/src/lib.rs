//! The parser stage of the mica interpreter pipeline: tokens to AST.
//!
//! `Parser` is a Pratt (top-down operator-precedence) parser: it tracks a
//! `current`/`peek` pair of tokens, and expressions are parsed by
//! repeatedly asking "does the next operator bind tighter than the
//! minimum precedence I was called with?" (see [`Parser::parse_expression`]
//! in `expr.rs`). Prefix and infix parsing "functions" are plain methods
//! dispatched through a `match` on the token kind rather than a literal
//! `HashMap` of function pointers. `TokenKind` carries payload data
//! (`Ident(Symbol)`, `Int(String)`, ...) so a match arm is both simpler and
//! cheaper than hashing a key type built around it.
//!
//! The parser never aborts on malformed input. Errors are pushed onto an
//! `errors` list as `Diagnostic`s (message plus the `Span` of the token that
//! triggered it) and parsing resynchronizes by skipping to the next `;`;
//! callers must check `errors()` before handing the resulting `Program` to
//! the evaluator.

mod ast;
mod expr;
mod stmt;

pub use ast::{
    Block, Expression, Identifier, InfixOp, Node, PrefixOp, Program, Statement,
};

use mica_lex::{Lexer, Token, TokenKind};
use mica_util::Diagnostic;

/// Precedence levels, ascending. Only the relative ordering matters; the
/// explicit discriminants make it easy to read off `PREFIX < CALL < INDEX`
/// at a glance in the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest = 0,
    Equals = 1,      // == !=
    LessGreater = 2, // < > <= >=
    Sum = 3,         // + -
    Product = 4,     // * /
    Prefix = 5,       // -x !x ++x --x
    Call = 6,        // f(...)
    Index = 7,       // a[i]
}

fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn from_source(source: &'a str) -> Self {
        Self::new(Lexer::new(source))
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Program { statements }
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.peek);
        self.peek = self.lexer.next_token();
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(&self.current.kind)
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(&self.peek.kind)
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        &self.peek.kind == kind
    }

    /// Advances past the peek token if it matches `kind`, else records a
    /// `"expected next token to be {expected}, got {actual} instead"`
    /// diagnostic (pointing at the unexpected peek token) and leaves
    /// position unchanged.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(&kind) {
            self.advance();
            true
        } else {
            self.errors.push(Diagnostic::error(
                format!(
                    "expected next token to be {}, got {} instead",
                    kind, self.peek.kind
                ),
                self.peek.span,
            ));
            false
        }
    }

    fn no_prefix_parse_fn_error(&mut self) {
        self.errors.push(Diagnostic::error(
            format!("no prefix parse function for {} found", self.current.kind),
            self.current.span,
        ));
    }

    /// Error recovery: skip tokens until the next `;` (or `Eof`), so one
    /// malformed statement does not cascade into spurious errors for every
    /// statement after it.
    fn resynchronize(&mut self) {
        while !matches!(self.current.kind, TokenKind::Semicolon | TokenKind::Eof) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();
        (program, parser.errors().to_vec())
    }

    #[test]
    fn parses_a_let_statement() {
        let (program, errors) = parse("let x = 5;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.to_string(), "let x = 5;");
    }

    #[test]
    fn empty_program_has_no_statements() {
        let (program, errors) = parse("");
        assert!(errors.is_empty());
        assert!(program.statements.is_empty());
    }

    #[test]
    fn parsing_is_total_even_for_garbage_input() {
        let (_program, errors) = parse("let = ; + + +");
        assert!(!errors.is_empty());
    }

    #[test]
    fn diagnostics_point_at_the_line_of_the_bad_token() {
        let (_program, errors) = parse("let x = 5;\nlet = 6;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span.line, 2);
        assert_eq!(errors[0].message, "expected next token to be IDENT, got = instead");
    }
}

#[cfg(test)]
mod proptests {
    use super::Parser;
    use proptest::prelude::*;

    proptest! {
        /// No arbitrary byte soup should ever make the parser hang or panic;
        /// it must always terminate with a `Program` (however empty) plus a
        /// list of errors.
        #[test]
        fn never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let source = String::from_utf8_lossy(&bytes).into_owned();
            let mut parser = Parser::from_source(&source);
            let _ = parser.parse_program();
        }

        /// A lone expression statement round-trips through `Display` with
        /// full parenthesization, independent of the specific integers
        /// chosen.
        #[test]
        fn integer_arithmetic_round_trips_through_display(a in 0i64..1000, b in 0i64..1000) {
            let source = format!("{a} + {b};");
            let mut parser = Parser::from_source(&source);
            let program = parser.parse_program();
            prop_assert!(parser.errors().is_empty());
            prop_assert_eq!(program.to_string(), format!("({a} + {b})"));
        }
    }
}
