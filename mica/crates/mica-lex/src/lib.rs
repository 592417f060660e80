//! The lexer stage of the mica interpreter pipeline: turns a raw source
//! string into a stream of [`Token`]s.
//!
//! mica's lexer is pull-based (Monkey-book style): [`Lexer::next_token`]
//! returns one token per call rather than tokenizing the whole input up
//! front. The parser in `mica-par` drives it, buffering a `current`/`peek`
//! pair of tokens as it goes.
//!
//! Lexing is total: every byte sequence, however malformed, produces a
//! finite token stream ending in `Eof`. There is no "lex error": an
//! unrecognized byte becomes `TokenKind::Illegal` and an unterminated
//! string just runs to end of input. Diagnostics belong to the parser,
//! which is the first stage that has enough context (an expected token, a
//! grammar position) to say something useful about a malformed lexeme.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{lookup_ident, Token, TokenKind};
