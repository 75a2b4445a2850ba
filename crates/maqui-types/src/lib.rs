#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod symbol;

pub use analyzer::Analyzer;
pub use ast::{AnnotatedExpr, Ast};
pub use error::CompileError;
pub use symbol::SymbolTable;


use maqui_parse::{Lexer, Parser};

/// Runs the whole front end over a source text in one blocking pass:
/// lex, parse, forward-declare, annotate.
pub fn analyze_str(filename: &str, src: &str) -> Ast {
    let parser = Parser::new(Lexer::new(filename, src));
    let mut analyzer = Analyzer::new(parser);
    let mut global = SymbolTable::global();
    analyzer.declare_into(&mut global);
    analyzer.analyze(global)
}
