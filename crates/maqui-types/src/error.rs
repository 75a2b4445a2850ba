//! Compile-time diagnostics accumulated by the context analyzer.

use maqui_ast::span::Location;
use maqui_ast::types::Type;
use std::fmt;

/// A single compile error. Errors are data, not control flow: every stage
/// keeps going after recording one, and the final list on the AST is
/// deduplicated structurally.
///
/// The canonical rendering is `"<file>:[start:end] <kind>: <detail>"`; nodes
/// that carry no source location drop the location clause.
#[derive(Clone, Debug, PartialEq)]
pub enum CompileError {
    BadExpr {
        loc: Location,
        message: String,
    },
    Undefined {
        name: String,
        loc: Option<Location>,
    },
    IncompatibleTypes {
        lhs: Type,
        rhs: Type,
        loc: Option<Location>,
    },
    UndefinedOperation {
        ty: Type,
        op: String,
        loc: Option<Location>,
    },
    UndefinedUnary {
        ty: Type,
        op: String,
        loc: Option<Location>,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::BadExpr { loc, message } => {
                write!(f, "{loc} bad expression: {message}")
            }
            CompileError::Undefined { name, loc } => {
                location_clause(f, loc)?;
                write!(f, "undefined: '{name}' is not defined")
            }
            CompileError::IncompatibleTypes { lhs, rhs, loc } => {
                location_clause(f, loc)?;
                write!(f, "incompatible types: {lhs} and {rhs}")
            }
            CompileError::UndefinedOperation { ty, op, loc } => {
                location_clause(f, loc)?;
                write!(f, "undefined operation: '{op}' is not defined for {ty}")
            }
            CompileError::UndefinedUnary { ty, op, loc } => {
                location_clause(f, loc)?;
                write!(f, "undefined operation: unary '{op}' is not defined for {ty}")
            }
        }
    }
}

fn location_clause(f: &mut fmt::Formatter<'_>, loc: &Option<Location>) -> fmt::Result {
    if let Some(loc) = loc {
        write!(f, "{loc} ")?;
    }
    Ok(())
}

impl std::error::Error for CompileError {}
