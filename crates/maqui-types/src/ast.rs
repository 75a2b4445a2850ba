//! The analyzed program: annotated statements plus file-scope context.

use crate::error::CompileError;
use crate::symbol::SymbolTable;
use maqui_ast::ast::Expr;

/// A top-level statement paired with the symbol-table snapshot taken right
/// after analyzing it.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedExpr {
    pub expr: Expr,
    pub table: SymbolTable,
}

/// The fully analyzed compilation unit. `errors` holds every diagnostic in
/// discovery order with structural duplicates removed; lowering only runs
/// when it is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Ast {
    pub filename: String,
    pub statements: Vec<AnnotatedExpr>,
    pub global: SymbolTable,
    pub errors: Vec<CompileError>,
}
