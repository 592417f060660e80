use mica_lex::TokenKind;
use mica_util::Diagnostic;

use crate::ast::{Expression, Identifier, InfixOp, Node, PrefixOp};
use crate::{Parser, Precedence};

impl<'a> Parser<'a> {
    /// The Pratt core: parse a prefix expression, then keep absorbing infix
    /// operators whose precedence beats `precedence`, the minimum binding
    /// power this call was invoked with. A nested call (e.g. the right-hand
    /// side of `a + b * c`) is invoked with a *higher* minimum, so it stops
    /// before consuming an operator the outer call should own instead.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(&TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.advance();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        let span = self.current.span;
        match self.current.kind.clone() {
            TokenKind::Ident(name) => Some(Expression::Identifier(Identifier { name, span })),
            TokenKind::Int(literal) => self.parse_integer_literal(&literal, span),
            TokenKind::Str(value) => Some(Expression::StringLiteral { value, span }),
            TokenKind::True => Some(Expression::Boolean { value: true, span }),
            TokenKind::False => Some(Expression::Boolean { value: false, span }),
            TokenKind::Bang => self.parse_prefix_expression(PrefixOp::Bang),
            TokenKind::Minus => self.parse_prefix_expression(PrefixOp::Minus),
            TokenKind::Increment => self.parse_prefix_expression(PrefixOp::Increment),
            TokenKind::Decrement => self.parse_prefix_expression(PrefixOp::Decrement),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::For => self.parse_for_expression(),
            TokenKind::Function => self.parse_function_literal(),
            _ => {
                self.no_prefix_parse_fn_error();
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.current.kind.clone() {
            TokenKind::Plus => self.parse_infix_expression(left, InfixOp::Add),
            TokenKind::Minus => self.parse_infix_expression(left, InfixOp::Sub),
            TokenKind::Asterisk => self.parse_infix_expression(left, InfixOp::Mul),
            TokenKind::Slash => self.parse_infix_expression(left, InfixOp::Div),
            TokenKind::Lt => self.parse_infix_expression(left, InfixOp::Lt),
            TokenKind::Gt => self.parse_infix_expression(left, InfixOp::Gt),
            TokenKind::Le => self.parse_infix_expression(left, InfixOp::Le),
            TokenKind::Ge => self.parse_infix_expression(left, InfixOp::Ge),
            TokenKind::Eq => self.parse_infix_expression(left, InfixOp::Eq),
            TokenKind::NotEq => self.parse_infix_expression(left, InfixOp::NotEq),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            other => {
                // precedence_of never assigns a non-Lowest precedence to a
                // kind without a matching arm here, so the parse_expression
                // loop condition guards against ever reaching this.
                self.errors.push(Diagnostic::error(
                    format!("no infix parse function for {other} found"),
                    self.current.span,
                ));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self, literal: &str, span: mica_util::Span) -> Option<Expression> {
        match literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { value, span }),
            Err(_) => {
                self.errors.push(Diagnostic::error(
                    format!("could not parse {literal} as integer"),
                    span,
                ));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, op: PrefixOp) -> Option<Expression> {
        let start = self.current.span;
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        let span = start.to(right.span());
        Some(Expression::Prefix {
            op,
            right: Box::new(right),
            span,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression, op: InfixOp) -> Option<Expression> {
        let precedence = self.current_precedence();
        self.advance();
        let right = self.parse_expression(precedence)?;
        let span = left.span().to(right.span());
        Some(Expression::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance(); // past '('
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let start = self.current.span;
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        let span = start.to(self.current.span);
        Some(Expression::ArrayLiteral { elements, span })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let start = self.current.span;
        let mut pairs = Vec::new();
        if self.peek_is(&TokenKind::RBrace) {
            self.advance();
            let span = start.to(self.current.span);
            return Some(Expression::HashLiteral { pairs, span });
        }
        loop {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if self.peek_is(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        let span = start.to(self.current.span);
        Some(Expression::HashLiteral { pairs, span })
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let start = self.current.span;
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block();
        let alternative = if self.peek_is(&TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };
        let span = start.to(self.current.span);
        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
            span,
        })
    }

    /// `for (init; cond; post) { body }`. `init` is always a `let`
    /// statement and `post` is always an assignment; both may be omitted
    /// (`for (; cond;) { ... }`), mirroring C's comma-less three-clause
    /// `for`.
    fn parse_for_expression(&mut self) -> Option<Expression> {
        let start = self.current.span;
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        let init: Option<Box<crate::Statement>> = if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
            None
        } else {
            self.advance();
            let stmt = self.parse_statement()?;
            if !matches!(self.current.kind, TokenKind::Semicolon) {
                self.errors.push(Diagnostic::error(
                    format!(
                        "expected next token to be ;, got {} instead",
                        self.current.kind
                    ),
                    self.current.span,
                ));
                return None;
            }
            Some(Box::new(stmt))
        };

        self.advance(); // onto the condition
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }

        let post: Option<Box<crate::Statement>> = if self.peek_is(&TokenKind::RParen) {
            self.advance();
            None
        } else {
            self.advance();
            let stmt = self.parse_statement()?;
            if !matches!(self.current.kind, TokenKind::RParen) && !self.expect_peek(TokenKind::RParen)
            {
                return None;
            }
            Some(Box::new(stmt))
        };

        if !matches!(self.current.kind, TokenKind::RParen) {
            self.errors.push(Diagnostic::error(
                format!(
                    "expected next token to be ), got {} instead",
                    self.current.kind
                ),
                self.current.span,
            ));
            return None;
        }

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        let span = start.to(self.current.span);
        Some(Expression::For {
            init,
            condition: Box::new(condition),
            post,
            body,
            span,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let start = self.current.span;
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        let span = start.to(self.current.span);
        Some(Expression::Function {
            parameters,
            body,
            span,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();
        if self.peek_is(&TokenKind::RParen) {
            self.advance();
            return Some(params);
        }
        params.push(self.expect_peek_ident()?);
        while self.peek_is(&TokenKind::Comma) {
            self.advance();
            params.push(self.expect_peek_ident()?);
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let start = function.span();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        let span = start.to(self.current.span);
        Some(Expression::Call {
            function: Box::new(function),
            arguments,
            span,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let start = left.span();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        let span = start.to(self.current.span);
        Some(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
            span,
        })
    }

    /// Parses a comma-separated list of expressions up to (and consuming)
    /// `end`. Shared by array literals, call arguments.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(&end) {
            self.advance();
            return Some(list);
        }
        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(&TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, InfixOp, PrefixOp, Statement};
    use crate::Parser;

    fn parse_expr(source: &str) -> Expression {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "{:?}", parser.errors());
        assert_eq!(program.statements.len(), 1);
        match program.statements.into_iter().next().unwrap() {
            Statement::Expression { expression, .. } => expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn precedence_climbs_multiplication_over_addition() {
        let expr = parse_expr("1 + 2 * 3;");
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn precedence_is_left_associative_for_same_level_operators() {
        let expr = parse_expr("1 - 2 - 3;");
        assert_eq!(expr.to_string(), "((1 - 2) - 3)");
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse_expr("(1 + 2) * 3;");
        assert_eq!(expr.to_string(), "((1 + 2) * 3)");
    }

    #[test]
    fn parses_prefix_operators() {
        let expr = parse_expr("-5;");
        assert!(matches!(
            expr,
            Expression::Prefix {
                op: PrefixOp::Minus,
                ..
            }
        ));
        let expr = parse_expr("!true;");
        assert!(matches!(
            expr,
            Expression::Prefix {
                op: PrefixOp::Bang,
                ..
            }
        ));
    }

    #[test]
    fn parses_comparison_operators_including_le_and_ge() {
        let expr = parse_expr("a <= b;");
        assert!(matches!(expr, Expression::Infix { op: InfixOp::Le, .. }));
        let expr = parse_expr("a >= b;");
        assert!(matches!(expr, Expression::Infix { op: InfixOp::Ge, .. }));
    }

    #[test]
    fn parses_call_expression_with_arguments() {
        let expr = parse_expr("add(1, 2 * 3, 4 + 5);");
        assert_eq!(expr.to_string(), "add(1, (2 * 3), (4 + 5))");
    }

    #[test]
    fn parses_index_expression() {
        let expr = parse_expr("myArray[1 + 1];");
        assert_eq!(expr.to_string(), "(myArray[(1 + 1)])");
    }

    #[test]
    fn parses_array_literal() {
        let expr = parse_expr("[1, 2 * 2, 3 + 3];");
        assert_eq!(expr.to_string(), "[1, (2 * 2), (3 + 3)]");
    }

    #[test]
    fn parses_empty_array_literal() {
        let expr = parse_expr("[];");
        assert_eq!(expr.to_string(), "[]");
    }

    #[test]
    fn parses_hash_literal_preserving_insertion_order() {
        let expr = parse_expr(r#"{"one": 1, "two": 2, "three": 3};"#);
        assert_eq!(expr.to_string(), "{one:1, two:2, three:3}");
    }

    #[test]
    fn parses_empty_hash_literal() {
        let expr = parse_expr("{};");
        assert_eq!(expr.to_string(), "{}");
    }

    #[test]
    fn parses_if_else_expression() {
        let expr = parse_expr("if (x < y) { x } else { y };");
        assert!(matches!(expr, Expression::If { .. }));
    }

    #[test]
    fn parses_if_without_else() {
        let expr = parse_expr("if (x < y) { x };");
        assert!(matches!(
            expr,
            Expression::If {
                alternative: None,
                ..
            }
        ));
    }

    #[test]
    fn parses_function_literal_with_parameters() {
        let expr = parse_expr("fn(x, y) { x + y; };");
        match expr {
            Expression::Function { parameters, .. } => assert_eq!(parameters.len(), 2),
            other => panic!("expected function literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_literal_with_no_parameters() {
        let expr = parse_expr("fn() { 1; };");
        match expr {
            Expression::Function { parameters, .. } => assert!(parameters.is_empty()),
            other => panic!("expected function literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_for_loop_with_full_clauses() {
        let expr = parse_expr("for (let i = 0; i < 3; i = i + 1) { i; };");
        match expr {
            Expression::For {
                init,
                post,
                body,
                ..
            } => {
                assert!(init.is_some());
                assert!(post.is_some());
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected for expression, got {other:?}"),
        }
    }

    #[test]
    fn integer_literal_overflow_is_a_parse_error() {
        let mut parser = Parser::from_source("99999999999999999999;");
        parser.parse_program();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(
            parser.errors()[0].message,
            "could not parse 99999999999999999999 as integer"
        );
    }

    #[test]
    fn no_prefix_parse_function_records_the_token_kind() {
        let mut parser = Parser::from_source(")");
        parser.parse_program();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(
            parser.errors()[0].message,
            "no prefix parse function for ) found"
        );
    }
}
