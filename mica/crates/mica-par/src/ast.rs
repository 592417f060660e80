//! The abstract syntax tree mica's parser builds and the evaluator walks.
//!
//! The tree is a tagged sum rather than a trait-object hierarchy: every
//! expression lives in one `Expression` enum and every statement in one
//! `Statement` enum, matched by variant rather than dispatched through a
//! vtable. The same closed-enum shape carries over to runtime values in
//! `mica-eval`: exhaustive `match` over a closed set of variants catches
//! missing cases at compile time, which a trait-object `Box<dyn Node>`
//! tree cannot.

use std::fmt;

use mica_util::{Span, Symbol};

/// Common capability of every AST node: it knows where it came from.
pub trait Node {
    fn span(&self) -> Span;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A `{ ... }` sequence of statements. In this language blocks do not
/// introduce a new lexical scope (see `mica-eval`'s environment model).
/// This type is purely syntactic grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// The operator of a `PrefixExpression`. `Increment`/`Decrement` are unary
/// operators here, not mutating increment/decrement statements. `++x`
/// evaluates to `x + 1` without rebinding anything; see `mica-eval` for
/// how that's enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Minus,
    Increment,
    Decrement,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrefixOp::Bang => "!",
            PrefixOp::Minus => "-",
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Le => "<=",
            InfixOp::Ge => ">=",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        value: i64,
        span: Span,
    },
    StringLiteral {
        value: String,
        span: Span,
    },
    Boolean {
        value: bool,
        span: Span,
    },
    ArrayLiteral {
        elements: Vec<Expression>,
        span: Span,
    },
    HashLiteral {
        pairs: Vec<(Expression, Expression)>,
        span: Span,
    },
    Prefix {
        op: PrefixOp,
        right: Box<Expression>,
        span: Span,
    },
    Infix {
        op: InfixOp,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
        span: Span,
    },
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
        span: Span,
    },
    For {
        init: Option<Box<Statement>>,
        condition: Box<Expression>,
        post: Option<Box<Statement>>,
        body: Block,
        span: Span,
    },
    Function {
        parameters: Vec<Identifier>,
        body: Block,
        span: Span,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },
}

impl Node for Expression {
    fn span(&self) -> Span {
        match self {
            Expression::Identifier(id) => id.span,
            Expression::IntegerLiteral { span, .. }
            | Expression::StringLiteral { span, .. }
            | Expression::Boolean { span, .. }
            | Expression::ArrayLiteral { span, .. }
            | Expression::HashLiteral { span, .. }
            | Expression::Prefix { span, .. }
            | Expression::Infix { span, .. }
            | Expression::Index { span, .. }
            | Expression::If { span, .. }
            | Expression::For { span, .. }
            | Expression::Function { span, .. }
            | Expression::Call { span, .. } => *span,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(id) => write!(f, "{id}"),
            Expression::IntegerLiteral { value, .. } => write!(f, "{value}"),
            Expression::StringLiteral { value, .. } => write!(f, "{value}"),
            Expression::Boolean { value, .. } => write!(f, "{value}"),
            Expression::ArrayLiteral { elements, .. } => {
                write!(f, "[")?;
                write_comma_separated(f, elements)?;
                write!(f, "]")
            }
            Expression::HashLiteral { pairs, .. } => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "}}")
            }
            Expression::Prefix { op, right, .. } => write!(f, "({op}{right})"),
            Expression::Infix { op, left, right, .. } => write!(f, "({left} {op} {right})"),
            Expression::Index { left, index, .. } => write!(f, "({left}[{index}])"),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if{condition} {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, "else {alt}")?;
                }
                Ok(())
            }
            Expression::For {
                condition, body, ..
            } => {
                write!(f, "for (;{condition};) {body}")
            }
            Expression::Function {
                parameters, body, ..
            } => {
                write!(f, "fn(")?;
                write_comma_separated_idents(f, parameters)?;
                write!(f, ") {body}")
            }
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                write!(f, "{function}(")?;
                write_comma_separated(f, arguments)?;
                write!(f, ")")
            }
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_comma_separated_idents(f: &mut fmt::Formatter<'_>, items: &[Identifier]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
        span: Span,
    },
    Assign {
        name: Identifier,
        value: Expression,
        span: Span,
    },
    Return {
        value: Expression,
        span: Span,
    },
    Expression {
        expression: Expression,
        span: Span,
    },
    Block(Block),
}

impl Node for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Let { span, .. }
            | Statement::Assign { span, .. }
            | Statement::Return { span, .. }
            | Statement::Expression { span, .. } => *span,
            Statement::Block(block) => block.span,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {name} = {value};"),
            Statement::Assign { name, value, .. } => write!(f, "{name} = {value};"),
            Statement::Return { value, .. } => write!(f, "return {value};"),
            Statement::Expression { expression, .. } => write!(f, "{expression}"),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}

/// The root of a parsed program: an ordered sequence of top-level
/// statements. Kept as its own type rather than a `Statement` variant,
/// since it is the one node that is never nested inside another: only
/// `Parser::parse_program` ever produces one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_infix_expression_fully_parenthesized() {
        let expr = Expression::Infix {
            op: InfixOp::Add,
            left: Box::new(Expression::IntegerLiteral {
                value: 1,
                span: Span::dummy(),
            }),
            right: Box::new(Expression::IntegerLiteral {
                value: 2,
                span: Span::dummy(),
            }),
            span: Span::dummy(),
        };
        assert_eq!(expr.to_string(), "(1 + 2)");
    }

    #[test]
    fn displays_let_statement_like_source() {
        let stmt = Statement::Let {
            name: Identifier {
                name: Symbol::intern("x"),
                span: Span::dummy(),
            },
            value: Expression::IntegerLiteral {
                value: 5,
                span: Span::dummy(),
            },
            span: Span::dummy(),
        };
        assert_eq!(stmt.to_string(), "let x = 5;");
    }
}
