//! The lowering's value environment.

use crate::ir::Value;
use std::collections::HashMap;

/// Maps identifiers to the IR values holding them, as a stack of scopes.
/// Reads fall through to outer scopes; writes always land in the innermost
/// one, so bindings made inside a function or branch never leak out.
#[derive(Clone, Debug, Default)]
pub struct ValueLookup {
    scopes: Vec<HashMap<String, Value>>,
}

impl ValueLookup {
    pub fn new() -> Self {
        ValueLookup {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }
}
