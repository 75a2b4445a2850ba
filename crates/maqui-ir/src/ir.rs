//! A small textual LLVM IR model.
//!
//! Only the constructs the lowering actually produces are represented:
//! byte-array globals, external declarations, void functions over named
//! basic blocks, integer arithmetic, comparisons, calls and branches. The
//! `Display` impls render assembler-ready IR; `Module`'s output is what gets
//! piped to the backend.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ty {
    Void,
    I1,
    I8,
    I32,
    Ptr(Box<Ty>),
    Array(usize, Box<Ty>),
}

impl Ty {
    pub fn ptr(inner: Ty) -> Self {
        Ty::Ptr(Box::new(inner))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Void => f.write_str("void"),
            Ty::I1 => f.write_str("i1"),
            Ty::I8 => f.write_str("i8"),
            Ty::I32 => f.write_str("i32"),
            Ty::Ptr(inner) => write!(f, "{inner}*"),
            Ty::Array(len, inner) => write!(f, "[{len} x {inner}]"),
        }
    }
}

/// An SSA operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A 32-bit integer constant.
    Int(i32),
    /// A named register, e.g. `%t3` or a function parameter.
    Local { name: String, ty: Ty },
    /// A function symbol; `ret` is its return type.
    Func { name: String, ret: Ty },
    /// Constant pointer to the first byte of an `[len x i8]` global.
    BytesPtr { global: String, len: usize },
}

impl Value {
    pub fn ty(&self) -> Ty {
        match self {
            Value::Int(_) => Ty::I32,
            Value::Local { ty, .. } => ty.clone(),
            Value::Func { ret, .. } => ret.clone(),
            Value::BytesPtr { .. } => Ty::ptr(Ty::I8),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Local { name, .. } => write!(f, "%{name}"),
            Value::Func { name, .. } => write!(f, "@{name}"),
            Value::BytesPtr { global, len } => write!(
                f,
                "getelementptr inbounds ([{len} x i8], [{len} x i8]* @{global}, i32 0, i32 0)"
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Binary {
        dst: String,
        op: BinOp,
        lhs: Value,
        rhs: Value,
    },
    Cmp {
        dst: String,
        op: CmpOp,
        lhs: Value,
        rhs: Value,
    },
    Call {
        dst: Option<String>,
        ret: Ty,
        callee: String,
        args: Vec<Value>,
        /// For variadic callees, the fixed parameter types: the call site
        /// must spell out the full signature, e.g. `call i32 (i8*, ...)`.
        variadic_params: Option<Vec<Ty>>,
    },
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Binary { dst, op, lhs, rhs } => {
                write!(f, "%{dst} = {op} {} {lhs}, {rhs}", lhs.ty())
            }
            Inst::Cmp { dst, op, lhs, rhs } => {
                write!(f, "%{dst} = icmp {op} {} {lhs}, {rhs}", lhs.ty())
            }
            Inst::Call {
                dst,
                ret,
                callee,
                args,
                variadic_params,
            } => {
                if let Some(dst) = dst {
                    write!(f, "%{dst} = ")?;
                }
                write!(f, "call {ret} ")?;
                if let Some(params) = variadic_params {
                    f.write_str("(")?;
                    for p in params {
                        write!(f, "{p}, ")?;
                    }
                    f.write_str("...) ")?;
                }
                write!(f, "@{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {arg}", arg.ty())?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Terminator {
    /// `ret void` — the language has no return values yet.
    Ret,
    Br {
        dest: String,
    },
    CondBr {
        cond: Value,
        then_dest: String,
        else_dest: String,
    },
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Ret => f.write_str("ret void"),
            Terminator::Br { dest } => write!(f, "br label %{dest}"),
            Terminator::CondBr {
                cond,
                then_dest,
                else_dest,
            } => write!(
                f,
                "br i1 {cond}, label %{then_dest}, label %{else_dest}"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub label: String,
    pub insts: Vec<Inst>,
    pub term: Option<Terminator>,
}

impl Block {
    pub fn new(label: impl Into<String>) -> Self {
        Block {
            label: label.into(),
            insts: Vec::new(),
            term: None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for inst in &self.insts {
            writeln!(f, "  {inst}")?;
        }
        if let Some(term) = &self.term {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub ret: Ty,
    pub params: Vec<Param>,
    pub blocks: Vec<Block>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.ret, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} %{}", p.ty, p.name)?;
        }
        writeln!(f, ") {{")?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        f.write_str("}\n")
    }
}

/// An external function declaration, e.g. the C `printf`.
#[derive(Clone, Debug, PartialEq)]
pub struct Declare {
    pub name: String,
    pub ret: Ty,
    pub params: Vec<Ty>,
    pub variadic: bool,
}

impl fmt::Display for Declare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declare {} @{}(", self.ret, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        if self.variadic {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

/// A constant byte-array global.
#[derive(Clone, Debug, PartialEq)]
pub struct Global {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{} = private constant [{} x i8] c\"",
            self.name,
            self.bytes.len()
        )?;
        for b in &self.bytes {
            match b {
                b' '..=b'~' if *b != b'"' && *b != b'\\' => write!(f, "{}", *b as char)?,
                _ => write!(f, "\\{b:02X}")?,
            }
        }
        f.write_str("\"")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub globals: Vec<Global>,
    pub declares: Vec<Declare>,
    pub functions: Vec<Function>,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for g in &self.globals {
            writeln!(f, "{g}")?;
        }
        if !self.globals.is_empty() {
            writeln!(f)?;
        }
        for d in &self.declares {
            writeln!(f, "{d}")?;
        }
        if !self.declares.is_empty() {
            writeln!(f)?;
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}
