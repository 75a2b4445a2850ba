//! Scoped name-to-type bindings plus the errors observed in that scope.

use crate::error::CompileError;
use maqui_ast::types::{ArgType, FuncType, Type};
use std::collections::HashMap;

/// A symbol table is the analyzer's working scope: bindings from names to
/// inferred types and the compile errors found while producing them.
/// Cloning one is the snapshot operation attached to each analyzed
/// statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    entries: HashMap<String, Type>,
    errors: Vec<CompileError>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// The file-scope table, pre-populated with the built-ins. The only
    /// built-in today is `print: func(v: any)`.
    pub fn global() -> Self {
        let mut table = SymbolTable::new();
        table.add(
            "print",
            Type::Func(FuncType {
                args: vec![ArgType {
                    name: "v".to_string(),
                    ty: Box::new(Type::Any),
                }],
                returns: vec![],
            }),
        );
        table
    }

    pub fn add(&mut self, name: impl Into<String>, ty: Type) {
        self.entries.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries.get(name)
    }

    pub fn add_error(&mut self, err: CompileError) {
        self.errors.push(err);
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }
}
