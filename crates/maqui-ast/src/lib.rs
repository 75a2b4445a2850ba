#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod span {
    use serde::Serialize;
    use std::fmt;
    use std::path::Path;

    /// A byte range inside a named source file. Positions count runes from
    /// the start of the file; `end` is exclusive.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct Location {
        pub file: String,
        pub start: u64,
        pub end: u64,
    }

    impl Location {
        pub fn new(file: impl Into<String>, start: u64, end: u64) -> Self {
            Location {
                file: file.into(),
                start,
                end,
            }
        }
    }

    impl fmt::Display for Location {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let base = Path::new(&self.file)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.file.clone());
            write!(f, "{}:[{}:{}]", base, self.start, self.end)
        }
    }
}

pub mod ast {
    use super::span::Location;
    use super::types::Type;
    use serde::Serialize;
    use std::fmt;

    /// A top-level statement or sub-expression of a Maqui program.
    ///
    /// The parser produces these; the analyzer fills in the `resolved_*`
    /// slots on declarations and calls.
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub enum Expr {
        /// Placeholder for a statement that failed to parse.
        Bad(BadExpr),
        FuncDecl(FuncDecl),
        VariableDecl(VariableDecl),
        FuncCall(FuncCall),
        Identifier(Identifier),
        If(IfExpr),
        Binary(BinaryExpr),
        Boolean(BooleanExpr),
        Unary(UnaryExpr),
        Literal(LiteralExpr),
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct BadExpr {
        pub loc: Location,
        pub message: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct FuncDecl {
        pub name: String,
        pub body: Vec<Expr>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct VariableDecl {
        pub name: String,
        pub loc: Location,
        pub value: Box<Expr>,
        /// Filled in by the analyzer; holds an error type when resolution
        /// failed for this node.
        pub resolved_type: Option<Type>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct FuncCall {
        pub name: String,
        pub loc: Location,
        pub args: Vec<Expr>,
        /// One entry per argument, filled in by the analyzer.
        pub resolved_arg_types: Vec<Type>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct Identifier {
        pub name: String,
        pub loc: Location,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct IfExpr {
        pub cond: Box<Expr>,
        pub then_body: Vec<Expr>,
        pub else_body: Option<Vec<Expr>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct BinaryExpr {
        pub op: BinaryOp,
        pub lhs: Box<Expr>,
        pub rhs: Box<Expr>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct BooleanExpr {
        pub op: BooleanOp,
        pub lhs: Box<Expr>,
        pub rhs: Box<Expr>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct UnaryExpr {
        pub op: UnaryOp,
        pub operand: Box<Expr>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct LiteralExpr {
        pub kind: LiteralKind,
        pub text: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum BinaryOp {
        Add,
        Sub,
        Mul,
        Div,
    }

    impl fmt::Display for BinaryOp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
            })
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum BooleanOp {
        Eq,
    }

    impl fmt::Display for BooleanOp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                BooleanOp::Eq => "==",
            })
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum UnaryOp {
        Neg,
    }

    impl fmt::Display for UnaryOp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                UnaryOp::Neg => "-",
            })
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum LiteralKind {
        Number,
        String,
    }
}

pub mod types {
    use serde::Serialize;
    use std::fmt;

    /// An inferred Maqui type.
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub enum Type {
        Basic(Basic),
        Func(FuncType),
        Arg(ArgType),
        /// Wildcard type, used only by built-in signatures.
        Any,
        /// Sentinel for failed resolution. Never equal to anything,
        /// including itself.
        Err(TypeErrReason),
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum Basic {
        Int,
        Str,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct ArgType {
        pub name: String,
        pub ty: Box<Type>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    pub struct FuncType {
        pub args: Vec<ArgType>,
        pub returns: Vec<Basic>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub enum TypeErrReason {
        Undefined,
        BadExpr,
        Incompatible,
        BadOp,
        Unimplemented,
        Unknown,
    }

    impl Type {
        pub fn int() -> Self {
            Type::Basic(Basic::Int)
        }

        pub fn string() -> Self {
            Type::Basic(Basic::Str)
        }

        pub fn is_err(&self) -> bool {
            matches!(self, Type::Err(_))
        }

        /// Semantic type equality. Structural on basic and function types,
        /// while `Any` matches every well-formed type and `Err` matches
        /// nothing at all. Distinct from the derived `PartialEq`, which is
        /// purely structural and used for error deduplication.
        pub fn equals(&self, other: &Type) -> bool {
            match (self, other) {
                (Type::Err(_), _) | (_, Type::Err(_)) => false,
                (Type::Any, _) | (_, Type::Any) => true,
                (Type::Basic(a), Type::Basic(b)) => a == b,
                (Type::Func(a), Type::Func(b)) => {
                    a.args.len() == b.args.len()
                        && a.returns.len() == b.returns.len()
                        && a.args
                            .iter()
                            .zip(&b.args)
                            .all(|(x, y)| x.name == y.name && x.ty.equals(&y.ty))
                        && a.returns.iter().zip(&b.returns).all(|(x, y)| x == y)
                }
                (Type::Arg(a), Type::Arg(b)) => a.name == b.name && a.ty.equals(&b.ty),
                _ => false,
            }
        }
    }

    impl fmt::Display for Basic {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Basic::Int => "int",
                Basic::Str => "string",
            })
        }
    }

    impl fmt::Display for FuncType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("func(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg.ty)?;
            }
            f.write_str(")")?;
            for (i, ret) in self.returns.iter().enumerate() {
                f.write_str(if i == 0 { " " } else { ", " })?;
                write!(f, "{ret}")?;
            }
            Ok(())
        }
    }

    impl fmt::Display for Type {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Type::Basic(b) => write!(f, "{b}"),
                Type::Func(func) => write!(f, "{func}"),
                Type::Arg(arg) => write!(f, "{}", arg.ty),
                Type::Any => f.write_str("any"),
                Type::Err(_) => f.write_str("~error"),
            }
        }
    }
}
