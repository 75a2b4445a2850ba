//! Two-phase context-sensitive analysis.
//!
//! Phase 1 ([`Analyzer::declare_into`]) makes a shallow pass over the
//! top-level statements and enters their bindings into the file scope, which
//! is what lets functions reference each other regardless of declaration
//! order. Phase 2 ([`Analyzer::analyze`]) walks every statement in full:
//! resolving identifiers, inferring types, validating operators, and
//! attaching a symbol-table snapshot per statement.
//!
//! The parser is a single-shot producer, so the analyzer caches the
//! statements it pulls during phase 1 and replays the cache in phase 2.

use crate::ast::{AnnotatedExpr, Ast};
use crate::error::CompileError;
use crate::symbol::SymbolTable;
use maqui_ast::ast::{Expr, LiteralKind};
use maqui_ast::types::{Basic, FuncType, Type, TypeErrReason};
use maqui_parse::{ExprSource, LexError};

pub struct Analyzer<S: ExprSource> {
    source: S,
    filename: String,
    cache: Vec<Expr>,
    pulled: bool,
    lex_error: Option<LexError>,
}

impl<S: ExprSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        let filename = source.filename().to_string();
        Analyzer {
            source,
            filename,
            cache: Vec::new(),
            pulled: false,
            lex_error: None,
        }
    }

    /// Phase 1: enter every top-level declaration into `scope` without
    /// descending into function bodies. Variable declarations are resolved
    /// against the scope as built so far, so a file-scope forward reference
    /// between variables diagnoses `undefined` rather than resolving.
    pub fn declare_into(&mut self, scope: &mut SymbolTable) {
        self.pull();
        for expr in &self.cache {
            match expr {
                Expr::FuncDecl(decl) => {
                    // Parameter and return syntax does not exist yet, so
                    // every function gets an empty signature.
                    scope.add(decl.name.clone(), Type::Func(FuncType::default()));
                }
                Expr::VariableDecl(decl) => {
                    let ty = resolve(scope, &decl.value);
                    scope.add(decl.name.clone(), ty);
                }
                _ => {}
            }
        }
    }

    /// Phase 2: produce the annotated AST. Each top-level statement is
    /// analyzed against a fresh clone of the global table; the statement's
    /// own binding is re-exported, the clone becomes the statement's
    /// snapshot, and new errors merge into the AST's deduplicated list.
    pub fn analyze(&mut self, global: SymbolTable) -> Ast {
        self.pull();

        let mut ast = Ast {
            filename: self.filename.clone(),
            statements: Vec::new(),
            global,
            errors: Vec::new(),
        };

        if let Some(err) = &self.lex_error {
            push_unique(
                &mut ast.errors,
                CompileError::BadExpr {
                    loc: err.loc.clone(),
                    message: err.message.clone(),
                },
            );
        }

        for mut expr in self.cache.clone() {
            let mut table = ast.global.clone();
            analyze_expr(&mut table, &mut expr);

            match &expr {
                Expr::VariableDecl(decl) => {
                    if let Some(ty) = table.get(&decl.name) {
                        ast.global.add(decl.name.clone(), ty.clone());
                    }
                }
                Expr::FuncDecl(decl) => {
                    if let Some(ty) = table.get(&decl.name) {
                        ast.global.add(decl.name.clone(), ty.clone());
                    }
                }
                _ => {}
            }

            for err in table.errors() {
                push_unique(&mut ast.errors, err.clone());
            }

            ast.statements.push(AnnotatedExpr { expr, table });
        }

        ast
    }

    fn pull(&mut self) {
        if self.pulled {
            return;
        }
        while let Some(expr) = self.source.get() {
            self.cache.push(expr);
        }
        self.lex_error = self.source.lex_error().cloned();
        self.pulled = true;
    }
}

fn push_unique(errors: &mut Vec<CompileError>, err: CompileError) {
    if !errors.contains(&err) {
        errors.push(err);
    }
}

fn analyze_expr(table: &mut SymbolTable, expr: &mut Expr) {
    match expr {
        Expr::Bad(bad) => {
            table.add_error(CompileError::BadExpr {
                loc: bad.loc.clone(),
                message: bad.message.clone(),
            });
        }
        Expr::FuncDecl(decl) => {
            table.add(decl.name.clone(), Type::Func(FuncType::default()));
            for child in decl.body.iter_mut() {
                analyze_expr(table, child);
            }
        }
        Expr::VariableDecl(decl) => {
            let ty = resolve(table, &decl.value);
            table.add(decl.name.clone(), ty.clone());
            decl.resolved_type = Some(ty);
        }
        Expr::FuncCall(call) => {
            if table.get(&call.name).is_none() {
                table.add_error(CompileError::Undefined {
                    name: call.name.clone(),
                    loc: Some(call.loc.clone()),
                });
                return;
            }
            // Arguments are resolved for their side effects and recorded on
            // the node; matching them against the callee signature waits on
            // function signatures existing at all.
            call.resolved_arg_types = call.args.iter().map(|arg| resolve(table, arg)).collect();
        }
        Expr::Identifier(id) => {
            if table.get(&id.name).is_none() {
                table.add_error(CompileError::Undefined {
                    name: id.name.clone(),
                    loc: Some(id.loc.clone()),
                });
            }
        }
        Expr::If(ifx) => {
            resolve(table, &ifx.cond);
            for child in ifx.then_body.iter_mut() {
                analyze_expr(table, child);
            }
            if let Some(else_body) = &mut ifx.else_body {
                for child in else_body.iter_mut() {
                    analyze_expr(table, child);
                }
            }
        }
        Expr::Binary(_) | Expr::Boolean(_) | Expr::Unary(_) => {
            // Only the recorded errors matter in statement position.
            resolve(table, expr);
        }
        Expr::Literal(_) => {}
    }
}

/// Infers the type of a value-position expression, recording diagnostics in
/// the table. Once an operand has already failed, its error type propagates
/// without further diagnostics so one mistake does not cascade.
fn resolve(table: &mut SymbolTable, expr: &Expr) -> Type {
    match expr {
        Expr::Bad(bad) => {
            table.add_error(CompileError::BadExpr {
                loc: bad.loc.clone(),
                message: bad.message.clone(),
            });
            Type::Err(TypeErrReason::BadExpr)
        }
        Expr::Identifier(id) => match table.get(&id.name) {
            Some(ty) => ty.clone(),
            None => {
                table.add_error(CompileError::Undefined {
                    name: id.name.clone(),
                    loc: Some(id.loc.clone()),
                });
                Type::Err(TypeErrReason::Undefined)
            }
        },
        Expr::Binary(bin) => resolve_operation(table, &bin.lhs, &bin.rhs, &bin.op.to_string()),
        Expr::Boolean(cmp) => resolve_operation(table, &cmp.lhs, &cmp.rhs, &cmp.op.to_string()),
        Expr::Unary(unary) => {
            let ty = resolve(table, &unary.operand);
            if ty.is_err() {
                return ty;
            }
            if !matches!(ty, Type::Basic(Basic::Int)) {
                table.add_error(CompileError::UndefinedUnary {
                    ty,
                    op: unary.op.to_string(),
                    loc: None,
                });
                return Type::Err(TypeErrReason::BadOp);
            }
            ty
        }
        Expr::Literal(lit) => match lit.kind {
            LiteralKind::Number => Type::int(),
            LiteralKind::String => Type::string(),
        },
        // Calls and ifs have no value semantics yet; declarations never
        // denote a value.
        Expr::FuncCall(_) | Expr::If(_) => Type::Err(TypeErrReason::Unimplemented),
        Expr::FuncDecl(_) | Expr::VariableDecl(_) => Type::Err(TypeErrReason::Unknown),
    }
}

fn resolve_operation(table: &mut SymbolTable, lhs: &Expr, rhs: &Expr, op: &str) -> Type {
    let t1 = resolve(table, lhs);
    let t2 = resolve(table, rhs);

    if t1.is_err() {
        return t1;
    }
    if t2.is_err() {
        return t2;
    }

    if !t1.equals(&t2) {
        table.add_error(CompileError::IncompatibleTypes {
            lhs: t1,
            rhs: t2,
            loc: None,
        });
        return Type::Err(TypeErrReason::Incompatible);
    }

    if !op_defined(&t1, op) {
        table.add_error(CompileError::UndefinedOperation {
            ty: t1,
            op: op.to_string(),
            loc: None,
        });
        return Type::Err(TypeErrReason::BadOp);
    }

    t1
}

/// Operator admissibility: functions admit no operator, strings admit only
/// concatenation, integers admit everything.
fn op_defined(ty: &Type, op: &str) -> bool {
    match ty {
        Type::Func(_) => false,
        Type::Basic(Basic::Str) => op == "+",
        _ => true,
    }
}
