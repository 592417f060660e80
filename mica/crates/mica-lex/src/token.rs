use std::fmt;

use mica_util::{Span, Symbol};

/// The category of a lexical token, plus whatever payload that category
/// carries (an interned name for identifiers, the raw digit run for
/// integers, the raw body for strings).
///
/// `Int` and `Str` deliberately hold the *unparsed* source text rather than
/// an already-decoded `i64`/`String` value: turning `"99999999999999999999"`
/// into a number is the parser's job (see `mica-par`'s
/// `"could not parse {literal} as integer"` diagnostic), not the lexer's.
/// The lexer only needs to recognize a maximal run of digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Illegal(char),
    Eof,

    Ident(Symbol),
    Int(String),
    Str(String),

    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Bang,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
    Increment,
    Decrement,

    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    For,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Illegal(c) => return write!(f, "ILLEGAL({c})"),
            TokenKind::Eof => "EOF",
            TokenKind::Ident(_) => "IDENT",
            TokenKind::Int(_) => "INT",
            TokenKind::Str(_) => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Function => "fn",
            TokenKind::Let => "let",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::For => "for",
        };
        f.write_str(s)
    }
}

/// A token together with the span of source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Maps an identifier's source text to its keyword token, if it is one.
///
/// Called once per identifier run; everything not in this table comes back
/// as a plain `IDENT`.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "fn" => TokenKind::Function,
        "let" => TokenKind::Let,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "for" => TokenKind::For,
        _ => TokenKind::Ident(Symbol::intern(ident)),
    }
}
