#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod lexer;
pub mod parser;
pub mod reader;
pub mod token;

pub use lexer::{LexError, Lexer, TokenSource, TokenStream};
pub use parser::{ExprSource, ExprStream, Parser};

use maqui_ast::ast::Expr;

/// Lexes and parses a source text in one blocking pass, returning the
/// statements in source order plus the lexer failure that cut the stream
/// short, if any.
pub fn parse_str(filename: &str, src: &str) -> (Vec<Expr>, Option<LexError>) {
    Parser::new(Lexer::new(filename, src)).run()
}
