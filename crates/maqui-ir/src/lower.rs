//! Lowers the annotated AST into a textual IR module.
//!
//! Function bodies split into two kinds of statements: block expressions
//! (today only `if`) open a subgraph of basic blocks that re-joins at a
//! fresh continuation block, while everything else appends flat instruction
//! sequences to the current block. Identifier values come from a scope-stack
//! environment that is saved around every function, so inner bindings never
//! leak outward.

use crate::builtin;
use crate::ir::{BinOp, Block, CmpOp, Function, Inst, Module, Terminator, Ty, Value};
use crate::value::ValueLookup;
use maqui_ast::ast::{
    BinaryOp, BooleanOp, Expr, FuncCall, FuncDecl, IfExpr, LiteralKind, UnaryOp,
};
use maqui_types::Ast;
use std::fmt;

/// A hard lowering failure. These are compiler invariant or capability gaps,
/// not user-facing compile errors: lowering only runs on error-free ASTs.
#[derive(Clone, Debug, PartialEq)]
pub enum LowerError {
    /// The construct has no IR realisation yet (string literals, `if` or a
    /// void call in value position).
    Unsupported { what: String },
    /// A numeric literal did not fit the 32-bit integer type.
    BadLiteral { text: String },
    /// The analyzer let something through it guarantees cannot happen.
    Invariant { message: String },
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::Unsupported { what } => write!(f, "cannot lower {what}"),
            LowerError::BadLiteral { text } => {
                write!(f, "integer literal out of range: {text}")
            }
            LowerError::Invariant { message } => write!(f, "lowering invariant: {message}"),
        }
    }
}

impl std::error::Error for LowerError {}

/// True for expressions that introduce control flow and therefore lower to
/// multiple basic blocks.
pub fn is_block_expr(expr: &Expr) -> bool {
    matches!(expr, Expr::If(_))
}

/// Lowers an error-free AST to an IR module with the built-ins installed.
/// Only top-level function declarations produce IR.
pub fn lower(ast: &Ast) -> Result<Module, LowerError> {
    let mut lowering = Lowering::new();
    for stmt in &ast.statements {
        if let Expr::FuncDecl(decl) = &stmt.expr {
            lowering.function(decl)?;
        }
    }
    Ok(lowering.module)
}

struct Lowering {
    module: Module,
    values: ValueLookup,
    tmps: usize,
    labels: usize,
}

impl Lowering {
    fn new() -> Self {
        let mut module = Module::default();
        let mut values = ValueLookup::new();
        builtin::install(&mut module, &mut values);
        Lowering {
            module,
            values,
            tmps: 0,
            labels: 0,
        }
    }

    fn function(&mut self, decl: &FuncDecl) -> Result<(), LowerError> {
        // The symbol goes into the enclosing environment first so the body
        // (and every later function) can call it.
        self.values.set(
            decl.name.clone(),
            Value::Func {
                name: decl.name.clone(),
                ret: Ty::Void,
            },
        );
        self.values.push();
        self.tmps = 0;
        self.labels = 0;

        let mut func = Function {
            name: decl.name.clone(),
            ret: Ty::Void,
            params: Vec::new(),
            blocks: vec![Block::new("entry")],
        };

        for stmt in &decl.body {
            self.statement(&mut func, stmt)?;
        }
        set_term(&mut func, Terminator::Ret);

        self.values.pop();
        self.module.functions.push(func);
        Ok(())
    }

    fn statement(&mut self, func: &mut Function, expr: &Expr) -> Result<(), LowerError> {
        match expr {
            Expr::If(ifx) => self.if_expr(func, ifx),
            Expr::VariableDecl(decl) => {
                let value = self.value(func, &decl.value)?;
                self.values.set(decl.name.clone(), value);
                Ok(())
            }
            Expr::FuncCall(call) => self.call(func, call).map(|_| ()),
            Expr::Binary(_) | Expr::Boolean(_) | Expr::Unary(_) => {
                self.value(func, expr).map(|_| ())
            }
            // Bare values have no effect, and nested function declarations
            // have no IR realisation.
            Expr::FuncDecl(_) | Expr::Identifier(_) | Expr::Literal(_) | Expr::Bad(_) => Ok(()),
        }
    }

    /// Lowers an `if` into a condition check, one block per branch, and a
    /// join block that becomes the new insertion point.
    fn if_expr(&mut self, func: &mut Function, ifx: &IfExpr) -> Result<(), LowerError> {
        let cond = self.value(func, &ifx.cond)?;
        let cond = self.truthy(func, cond);

        let n = self.labels;
        self.labels += 1;
        let then_label = format!("then{n}");
        let else_label = format!("else{n}");
        let join_label = format!("endif{n}");

        set_term(
            func,
            Terminator::CondBr {
                cond,
                then_dest: then_label.clone(),
                else_dest: if ifx.else_body.is_some() {
                    else_label.clone()
                } else {
                    join_label.clone()
                },
            },
        );

        func.blocks.push(Block::new(then_label));
        self.branch_body(func, &ifx.then_body, &join_label)?;

        if let Some(else_body) = &ifx.else_body {
            func.blocks.push(Block::new(else_label));
            self.branch_body(func, else_body, &join_label)?;
        }

        func.blocks.push(Block::new(join_label));
        Ok(())
    }

    fn branch_body(
        &mut self,
        func: &mut Function,
        body: &[Expr],
        join_label: &str,
    ) -> Result<(), LowerError> {
        self.values.push();
        let result = body.iter().try_for_each(|stmt| self.statement(func, stmt));
        self.values.pop();
        result?;

        set_term(
            func,
            Terminator::Br {
                dest: join_label.to_string(),
            },
        );
        Ok(())
    }

    /// Lowers a value-position expression, appending its instructions to the
    /// current block and returning the operand holding the result.
    fn value(&mut self, func: &mut Function, expr: &Expr) -> Result<Value, LowerError> {
        match expr {
            Expr::Literal(lit) => match lit.kind {
                LiteralKind::Number => {
                    let v: i32 = lit.text.parse().map_err(|_| LowerError::BadLiteral {
                        text: lit.text.clone(),
                    })?;
                    Ok(Value::Int(v))
                }
                LiteralKind::String => Err(LowerError::Unsupported {
                    what: "string literals".to_string(),
                }),
            },
            Expr::Identifier(id) => {
                self.values
                    .get(&id.name)
                    .cloned()
                    .ok_or_else(|| LowerError::Invariant {
                        message: format!("undefined identifier '{}'", id.name),
                    })
            }
            Expr::Binary(bin) => {
                let lhs = self.value(func, &bin.lhs)?;
                let rhs = self.value(func, &bin.rhs)?;
                let op = match bin.op {
                    BinaryOp::Add => BinOp::Add,
                    BinaryOp::Sub => BinOp::Sub,
                    BinaryOp::Mul => BinOp::Mul,
                    // No unsigned or float division exists at the language
                    // level; everything divides signed.
                    BinaryOp::Div => BinOp::SDiv,
                };
                Ok(self.binary(func, op, lhs, rhs))
            }
            Expr::Boolean(cmp) => {
                let lhs = self.value(func, &cmp.lhs)?;
                let rhs = self.value(func, &cmp.rhs)?;
                let BooleanOp::Eq = cmp.op;
                let dst = self.tmp();
                push_inst(
                    func,
                    Inst::Cmp {
                        dst: dst.clone(),
                        op: CmpOp::Eq,
                        lhs,
                        rhs,
                    },
                );
                Ok(Value::Local { name: dst, ty: Ty::I1 })
            }
            Expr::Unary(unary) => {
                let operand = self.value(func, &unary.operand)?;
                let UnaryOp::Neg = unary.op;
                Ok(self.binary(func, BinOp::Mul, operand, Value::Int(-1)))
            }
            Expr::FuncCall(call) => match self.call(func, call)? {
                Some(value) => Ok(value),
                None => Err(LowerError::Unsupported {
                    what: format!("value of void call to '{}'", call.name),
                }),
            },
            Expr::If(_) => Err(LowerError::Unsupported {
                what: "if expressions in value position".to_string(),
            }),
            Expr::Bad(_) | Expr::FuncDecl(_) | Expr::VariableDecl(_) => {
                Err(LowerError::Invariant {
                    message: "unlowerable expression survived analysis".to_string(),
                })
            }
        }
    }

    fn call(&mut self, func: &mut Function, call: &FuncCall) -> Result<Option<Value>, LowerError> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.value(func, arg)?);
        }

        let callee = match self.values.get(&call.name) {
            Some(Value::Func { name, ret }) => (name.clone(), ret.clone()),
            _ => {
                return Err(LowerError::Invariant {
                    message: format!("'{}' is not a known function", call.name),
                })
            }
        };

        let (callee_name, ret) = callee;
        let dst = if ret == Ty::Void {
            None
        } else {
            Some(self.tmp())
        };
        push_inst(
            func,
            Inst::Call {
                dst: dst.clone(),
                ret: ret.clone(),
                callee: callee_name,
                args,
                variadic_params: None,
            },
        );

        Ok(dst.map(|name| Value::Local { name, ty: ret }))
    }

    fn binary(&mut self, func: &mut Function, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let dst = self.tmp();
        push_inst(
            func,
            Inst::Binary {
                dst: dst.clone(),
                op,
                lhs,
                rhs,
            },
        );
        Value::Local { name: dst, ty: Ty::I32 }
    }

    /// Branch conditions must be `i1`; anything wider compares against zero.
    fn truthy(&mut self, func: &mut Function, cond: Value) -> Value {
        if cond.ty() == Ty::I1 {
            return cond;
        }
        let dst = self.tmp();
        push_inst(
            func,
            Inst::Cmp {
                dst: dst.clone(),
                op: CmpOp::Ne,
                lhs: cond,
                rhs: Value::Int(0),
            },
        );
        Value::Local { name: dst, ty: Ty::I1 }
    }

    fn tmp(&mut self) -> String {
        let name = format!("t{}", self.tmps);
        self.tmps += 1;
        name
    }
}

fn push_inst(func: &mut Function, inst: Inst) {
    if let Some(block) = func.blocks.last_mut() {
        block.insts.push(inst);
    }
}

/// Seals the current block with `term` unless it already has a terminator.
fn set_term(func: &mut Function, term: Terminator) {
    if let Some(block) = func.blocks.last_mut() {
        if block.term.is_none() {
            block.term = Some(term);
        }
    }
}
