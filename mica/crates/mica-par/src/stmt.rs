use mica_lex::TokenKind;
use mica_util::Diagnostic;

use crate::ast::{Block, Identifier, Statement};
use crate::{Parser, Precedence};

impl<'a> Parser<'a> {
    /// Statement dispatch: `let`/`return` have their own grammar, a bare
    /// `IDENT` followed by `=` is an assignment, everything else is an
    /// expression statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        match &self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Ident(_) if self.peek_is(&TokenKind::Assign) => {
                self.parse_assign_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        let name = match self.expect_peek_ident() {
            Some(name) => name,
            None => {
                self.resynchronize();
                return None;
            }
        };
        if !self.expect_peek(TokenKind::Assign) {
            self.resynchronize();
            return None;
        }
        self.advance(); // onto the value expression
        let value = self.parse_expr_or_resync(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
        }
        let span = start.to(self.current.span);
        Some(Statement::Let { name, value, span })
    }

    fn parse_assign_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        let name = match &self.current.kind {
            TokenKind::Ident(name) => Identifier {
                name: *name,
                span: self.current.span,
            },
            _ => unreachable!("parse_assign_statement requires an IDENT current token"),
        };
        self.advance(); // consume ident, current == '='
        self.advance(); // onto the value expression
        let value = self.parse_expr_or_resync(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
        }
        let span = start.to(self.current.span);
        Some(Statement::Assign { name, value, span })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.advance(); // onto the return value expression
        let value = self.parse_expr_or_resync(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
        }
        let span = start.to(self.current.span);
        Some(Statement::Return { value, span })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        let expression = self.parse_expr_or_resync(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
        }
        let span = start.to(self.current.span);
        Some(Statement::Expression { expression, span })
    }

    /// Parses a `{ ... }` block. The caller must leave `current` on the
    /// opening `{`; on return `current` is the matching `}` (or `Eof`, if
    /// the block was never closed, in which case an error is recorded).
    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.current.span;
        self.advance(); // past '{'
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::RBrace | TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        if matches!(self.current.kind, TokenKind::Eof) {
            self.errors.push(Diagnostic::error(
                format!(
                    "expected next token to be {}, got {} instead",
                    TokenKind::RBrace,
                    TokenKind::Eof
                ),
                self.current.span,
            ));
        }
        let span = start.to(self.current.span);
        Block { statements, span }
    }

    fn expect_peek_ident(&mut self) -> Option<Identifier> {
        if let TokenKind::Ident(name) = &self.peek.kind {
            let name = *name;
            self.advance();
            Some(Identifier {
                name,
                span: self.current.span,
            })
        } else {
            self.errors.push(Diagnostic::error(
                format!(
                    "expected next token to be IDENT, got {} instead",
                    self.peek.kind
                ),
                self.peek.span,
            ));
            None
        }
    }

    /// Runs [`Parser::parse_expression`] and, on failure, resynchronizes to
    /// the next `;` so the rest of the program can still be parsed.
    fn parse_expr_or_resync(&mut self, precedence: Precedence) -> Option<crate::Expression> {
        match self.parse_expression(precedence) {
            Some(expr) => Some(expr),
            None => {
                self.resynchronize();
                None
            }
        }
    }
}
